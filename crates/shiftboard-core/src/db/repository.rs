//! Schedule repository implementation

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::table::{to_sql_value, Table};
use crate::error::Result;
use crate::models::{Record, ResourceDetails};

/// Trait for scheduler storage operations
pub trait ScheduleRepository {
    /// Every row of a table, ordered by id
    fn load(&self, table: Table) -> Result<Vec<Record>>;

    /// Insert a row and return the identifier the database assigned
    fn insert(&self, table: Table, record: &Record) -> Result<i64>;

    /// Delete every row whose id is in `ids`
    fn delete(&self, table: Table, ids: &[i64]) -> Result<usize>;

    /// Overwrite the given columns of one row
    fn update(&self, table: Table, id: i64, record: &Record) -> Result<usize>;

    /// Extra information about a resource, if any was recorded
    fn resource_details(&self, resource_id: &str) -> Result<Option<ResourceDetails>>;
}

/// `SQLite` implementation of `ScheduleRepository`
pub struct SqliteScheduleRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteScheduleRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Split a record into catalog column names and bindable values
    fn bind_columns(
        table: Table,
        record: &Record,
    ) -> Result<(Vec<&'static str>, Vec<rusqlite::types::Value>)> {
        let mut columns = Vec::with_capacity(record.len());
        let mut values = Vec::with_capacity(record.len());
        for (field, value) in record {
            let column = table.require_column(field)?;
            columns.push(column.name);
            values.push(to_sql_value(value)?);
        }
        Ok((columns, values))
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

impl ScheduleRepository for SqliteScheduleRepository<'_> {
    fn load(&self, table: Table) -> Result<Vec<Record>> {
        let columns = table.columns();
        let column_list = columns
            .iter()
            .map(|column| format!("\"{}\"", column.name))
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {column_list} FROM {} ORDER BY id",
            table.name()
        ))?;

        let rows = stmt
            .query_map([], |row| {
                let mut record = Record::new();
                for (index, column) in columns.iter().enumerate() {
                    let value: rusqlite::types::Value = row.get(index)?;
                    record.insert(column.name.to_string(), column.to_json(value));
                }
                Ok(record)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    fn insert(&self, table: Table, record: &Record) -> Result<i64> {
        let (columns, values) = Self::bind_columns(table, record)?;

        if columns.is_empty() {
            self.conn.execute(
                &format!("INSERT INTO {} DEFAULT VALUES", table.name()),
                [],
            )?;
        } else {
            let column_list = columns
                .iter()
                .map(|name| format!("\"{name}\""))
                .collect::<Vec<_>>()
                .join(", ");
            self.conn.execute(
                &format!(
                    "INSERT INTO {} ({column_list}) VALUES ({})",
                    table.name(),
                    placeholders(values.len())
                ),
                params_from_iter(values),
            )?;
        }

        Ok(self.conn.last_insert_rowid())
    }

    fn delete(&self, table: Table, ids: &[i64]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let deleted = self.conn.execute(
            &format!(
                "DELETE FROM {} WHERE id IN ({})",
                table.name(),
                placeholders(ids.len())
            ),
            params_from_iter(ids),
        )?;

        Ok(deleted)
    }

    fn update(&self, table: Table, id: i64, record: &Record) -> Result<usize> {
        let (columns, mut values) = Self::bind_columns(table, record)?;
        if columns.is_empty() {
            return Ok(0);
        }

        let assignments = columns
            .iter()
            .map(|name| format!("\"{name}\" = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        values.push(rusqlite::types::Value::Integer(id));

        let updated = self.conn.execute(
            &format!("UPDATE {} SET {assignments} WHERE id = ?", table.name()),
            params_from_iter(values),
        )?;

        Ok(updated)
    }

    fn resource_details(&self, resource_id: &str) -> Result<Option<ResourceDetails>> {
        let details = self
            .conn
            .query_row(
                "SELECT jobTitle, yearsExperience, yearsWithCompany, age, gender, additionalInfo
                 FROM resource_details
                 WHERE resourceId = ?
                 ORDER BY id
                 LIMIT 1",
                params![resource_id],
                |row| {
                    Ok(ResourceDetails {
                        job_title: row.get(0)?,
                        years_experience: row.get(1)?,
                        years_with_company: row.get(2)?,
                        age: row.get(3)?,
                        gender: row.get(4)?,
                        additional_info: row.get(5)?,
                    })
                },
            )
            .optional()?;

        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::initialize;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_load_empty() {
        let conn = setup();
        let repo = SqliteScheduleRepository::new(&conn);
        assert!(repo.load(Table::Resources).unwrap().is_empty());
        assert!(repo.load(Table::Events).unwrap().is_empty());
    }

    #[test]
    fn test_insert_assigns_identifiers() {
        let conn = setup();
        let repo = SqliteScheduleRepository::new(&conn);

        let first = repo.insert(Table::Resources, &record(json!({ "name": "Arnold" }))).unwrap();
        let second = repo.insert(Table::Resources, &record(json!({ "name": "Gloria" }))).unwrap();
        assert!(second > first);

        let rows = repo.load(Table::Resources).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], json!(first));
        assert_eq!(rows[0]["name"], json!("Arnold"));
        assert_eq!(rows[0]["readOnly"], json!(false));
        assert_eq!(rows[0]["eventColor"], json!(null));
    }

    #[test]
    fn test_insert_rejects_unknown_column() {
        let conn = setup();
        let repo = SqliteScheduleRepository::new(&conn);

        let err = repo
            .insert(Table::Resources, &record(json!({ "name": "R", "salary": 10 })))
            .unwrap_err();
        assert!(matches!(err, crate::Error::UnknownColumn { .. }));
        assert!(repo.load(Table::Resources).unwrap().is_empty());
    }

    #[test]
    fn test_delete_by_id_set() {
        let conn = setup();
        let repo = SqliteScheduleRepository::new(&conn);
        let ids: Vec<i64> = ["A", "B", "C"]
            .iter()
            .map(|name| repo.insert(Table::Resources, &record(json!({ "name": name }))).unwrap())
            .collect();

        let deleted = repo.delete(Table::Resources, &[ids[0], ids[2], 999]).unwrap();
        assert_eq!(deleted, 2);

        let rows = repo.load(Table::Resources).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], json!("B"));
    }

    #[test]
    fn test_delete_empty_set_is_noop() {
        let conn = setup();
        let repo = SqliteScheduleRepository::new(&conn);
        assert_eq!(repo.delete(Table::Events, &[]).unwrap(), 0);
    }

    #[test]
    fn test_update_changes_only_given_columns() {
        let conn = setup();
        let repo = SqliteScheduleRepository::new(&conn);
        let resource = repo.insert(Table::Resources, &record(json!({ "name": "Team" }))).unwrap();
        let event = repo
            .insert(
                Table::Events,
                &record(json!({
                    "name": "Standup",
                    "resourceId": resource,
                    "startDate": "2024-01-01T09:00:00",
                    "endDate": "2024-01-01T09:15:00"
                })),
            )
            .unwrap();

        let updated = repo
            .update(Table::Events, event, &record(json!({ "name": "Daily", "allDay": true })))
            .unwrap();
        assert_eq!(updated, 1);

        let rows = repo.load(Table::Events).unwrap();
        assert_eq!(rows[0]["name"], json!("Daily"));
        assert_eq!(rows[0]["allDay"], json!(true));
        assert_eq!(rows[0]["startDate"], json!("2024-01-01T09:00:00"));
        assert_eq!(rows[0]["resourceId"], json!(resource));
    }

    #[test]
    fn test_update_missing_row_touches_nothing() {
        let conn = setup();
        let repo = SqliteScheduleRepository::new(&conn);
        let updated = repo
            .update(Table::Resources, 42, &record(json!({ "name": "Ghost" })))
            .unwrap();
        assert_eq!(updated, 0);
    }

    #[test]
    fn test_event_requires_existing_resource() {
        let conn = setup();
        let repo = SqliteScheduleRepository::new(&conn);
        let err = repo
            .insert(Table::Events, &record(json!({ "name": "Orphan", "resourceId": 77 })))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Sqlite(_)));
    }

    #[test]
    fn test_resource_details_lookup() {
        let conn = setup();
        let repo = SqliteScheduleRepository::new(&conn);
        let resource = repo.insert(Table::Resources, &record(json!({ "name": "Kim" }))).unwrap();
        conn.execute(
            "INSERT INTO resource_details (resourceId, jobTitle, yearsExperience, age, gender)
             VALUES (?1, 'Engineer', 7, 31, 'F')",
            params![resource],
        )
        .unwrap();

        let details = repo
            .resource_details(&resource.to_string())
            .unwrap()
            .unwrap();
        assert_eq!(details.job_title.as_deref(), Some("Engineer"));
        assert_eq!(details.years_experience, Some(7));
        assert_eq!(details.years_with_company, None);
        assert_eq!(details.age, Some(31));

        assert_eq!(repo.resource_details("12345").unwrap(), None);
        assert_eq!(repo.resource_details("not-a-number").unwrap(), None);
    }
}
