//! shiftboard-core - Core library for Shiftboard
//!
//! This crate contains the table catalog, the `SQLite` store, and the batch
//! sync algorithm behind the scheduling API.

pub mod db;
pub mod error;
pub mod models;
pub mod sync;

pub use db::{Database, Table};
pub use error::{Error, Result};
pub use models::{PhantomMapping, Record, ResourceDetails, SyncBatch};
