//! Error types for shiftboard-core

use thiserror::Error;

/// Result type alias using shiftboard-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in shiftboard-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error not raised by `SQLite` itself
    #[error("Database error: {0}")]
    Database(String),

    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Record field that is not a column of the table
    #[error("Unknown column `{column}` for table `{table}`")]
    UnknownColumn { table: &'static str, column: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
