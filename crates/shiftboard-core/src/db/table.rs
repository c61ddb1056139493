//! Catalog of the tables the sync API may touch
//!
//! Table and column names are the only identifiers spliced into SQL text, so
//! both come from the static lists below and never from request data.

use std::fmt;

use rusqlite::types::Value as SqlValue;
use serde_json::{Number, Value};

use crate::error::{Error, Result};

/// Storage kind of a column, used to turn stored values back into JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    Text,
    /// Stored as 0/1, returned as `true`/`false`
    Bool,
}

/// A column of a syncable table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn column(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

const RESOURCE_COLUMNS: &[Column] = &[
    column("id", ColumnKind::Integer),
    column("name", ColumnKind::Text),
    column("eventColor", ColumnKind::Text),
    column("readOnly", ColumnKind::Bool),
];

const EVENT_COLUMNS: &[Column] = &[
    column("id", ColumnKind::Integer),
    column("name", ColumnKind::Text),
    column("readOnly", ColumnKind::Bool),
    column("resourceId", ColumnKind::Integer),
    column("timeZone", ColumnKind::Text),
    column("draggable", ColumnKind::Bool),
    column("resizable", ColumnKind::Text),
    column("children", ColumnKind::Text),
    column("allDay", ColumnKind::Bool),
    column("duration", ColumnKind::Real),
    column("durationUnit", ColumnKind::Text),
    column("startDate", ColumnKind::Text),
    column("endDate", ColumnKind::Text),
    column("exceptionDates", ColumnKind::Text),
    column("recurrenceRule", ColumnKind::Text),
    column("cls", ColumnKind::Text),
    column("eventColor", ColumnKind::Text),
    column("eventStyle", ColumnKind::Text),
    column("iconCls", ColumnKind::Text),
    column("style", ColumnKind::Text),
];

/// Tables that accept sync batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Resources,
    Events,
}

impl Table {
    /// Every syncable table
    pub const ALL: [Self; 2] = [Self::Resources, Self::Events];

    /// SQL name of the table
    pub const fn name(self) -> &'static str {
        match self {
            Self::Resources => "resources",
            Self::Events => "events",
        }
    }

    /// Columns in storage order
    pub const fn columns(self) -> &'static [Column] {
        match self {
            Self::Resources => RESOURCE_COLUMNS,
            Self::Events => EVENT_COLUMNS,
        }
    }

    /// Look up a column by its wire name
    pub fn column(self, name: &str) -> Option<&'static Column> {
        self.columns().iter().find(|column| column.name == name)
    }

    /// Whether `exceptionDates` is stored as JSON text for this table
    pub const fn encodes_exception_dates(self) -> bool {
        matches!(self, Self::Events)
    }

    /// Resolve a record field to a catalog column, rejecting anything else
    pub fn require_column(self, name: &str) -> Result<&'static Column> {
        self.column(name).ok_or_else(|| Error::UnknownColumn {
            table: self.name(),
            column: name.to_string(),
        })
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert a JSON value into a bindable `SQLite` value
///
/// Arrays and objects are stored as their JSON text.
pub fn to_sql_value(value: &Value) -> Result<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(flag) => SqlValue::Integer(i64::from(*flag)),
        Value::Number(number) => number.as_i64().map_or_else(
            || SqlValue::Real(number.as_f64().unwrap_or_default()),
            SqlValue::Integer,
        ),
        Value::String(text) => SqlValue::Text(text.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(serde_json::to_string(value)?),
    })
}

impl Column {
    /// Convert a stored value back to JSON according to the column kind
    pub fn to_json(&self, value: SqlValue) -> Value {
        match (self.kind, value) {
            (_, SqlValue::Null) => Value::Null,
            (ColumnKind::Bool, SqlValue::Integer(flag)) => Value::Bool(flag != 0),
            (_, SqlValue::Integer(number)) => Value::from(number),
            (_, SqlValue::Real(number)) => Number::from_f64(number).map_or(Value::Null, Value::Number),
            (_, SqlValue::Text(text)) => Value::String(text),
            (_, SqlValue::Blob(bytes)) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }
}
