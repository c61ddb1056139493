//! Data models for Shiftboard

mod batch;
mod resource_details;

pub use batch::{PhantomMapping, RemovedRecord, SyncBatch, UpdatedRecord, PHANTOM_ID_FIELD};
pub use resource_details::ResourceDetails;

/// A row as exchanged with the client: column name to JSON value
pub type Record = serde_json::Map<String, serde_json::Value>;
