//! Schema bootstrap

use rusqlite::Connection;

use crate::error::Result;

/// Create the scheduler tables if they do not exist yet. Idempotent.
pub fn bootstrap(conn: &Connection) -> Result<()> {
    create_resources_table(conn)?;
    create_events_table(conn)?;
    create_resource_details_table(conn)?;
    Ok(())
}

fn create_resources_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS resources (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            eventColor  TEXT,
            readOnly    INTEGER NOT NULL DEFAULT 0
        );",
    )?;
    Ok(())
}

/// `exceptionDates` holds the JSON text of the recurrence exclusions.
fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS events (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            readOnly        INTEGER NOT NULL DEFAULT 0,
            resourceId      INTEGER REFERENCES resources(id) ON DELETE CASCADE,
            timeZone        TEXT,
            draggable       INTEGER NOT NULL DEFAULT 1,
            resizable       TEXT DEFAULT '1',
            children        TEXT,
            allDay          INTEGER NOT NULL DEFAULT 0,
            duration        REAL,
            durationUnit    TEXT DEFAULT 'day',
            startDate       TEXT,
            endDate         TEXT,
            exceptionDates  TEXT,
            recurrenceRule  TEXT,
            cls             TEXT,
            eventColor      TEXT,
            eventStyle      TEXT,
            iconCls         TEXT,
            style           TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_events_resource
            ON events(resourceId);",
    )?;
    Ok(())
}

fn create_resource_details_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS resource_details (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            resourceId        INTEGER NOT NULL REFERENCES resources(id) ON DELETE CASCADE,
            jobTitle          TEXT,
            yearsExperience   INTEGER,
            yearsWithCompany  INTEGER,
            age               INTEGER,
            gender            TEXT,
            additionalInfo    TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_resource_details_resource
            ON resource_details(resourceId);",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        bootstrap(&conn).unwrap();
        bootstrap(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('resources', 'events', 'resource_details')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn catalog_columns_exist_in_schema() {
        let conn = Connection::open_in_memory().unwrap();
        bootstrap(&conn).unwrap();

        for table in crate::db::Table::ALL {
            let mut stmt = conn
                .prepare(&format!("SELECT name FROM pragma_table_info('{}')", table.name()))
                .unwrap();
            let names: Vec<String> = stmt
                .query_map([], |row| row.get(0))
                .unwrap()
                .collect::<rusqlite::Result<_>>()
                .unwrap();
            for column in table.columns() {
                assert!(
                    names.iter().any(|name| name == column.name),
                    "{}.{} missing from schema",
                    table.name(),
                    column.name
                );
            }
        }
    }
}
