//! Database layer for Shiftboard

mod connection;
mod repository;
mod schema;
mod table;

pub use connection::Database;
pub use repository::{ScheduleRepository, SqliteScheduleRepository};
pub use table::{to_sql_value, Column, ColumnKind, Table};
