//! Database connection management

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use super::schema;
use crate::error::{Error, Result};

/// Shared handle to the scheduler database
///
/// Cheap to clone. Statements run on tokio's blocking pool so async handlers
/// never stall the runtime; the mutex serializes access to the connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the database at the given path, creating it if it doesn't exist
    ///
    /// Creates the schema automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        initialize(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool
    pub async fn call<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| Error::Database("connection lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| Error::Database(format!("database task failed: {e}")))?
    }
}

/// Apply connection pragmas and create the schema
pub(crate) fn initialize(conn: &Connection) -> Result<()> {
    // WAL is not available for in-memory databases; ignore the refusal
    conn.pragma_update(None, "journal_mode", "WAL").ok();
    conn.pragma_update(None, "foreign_keys", "ON")?;
    schema::bootstrap(conn)
}
