//! Sync batch model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Record;

/// Field carrying the client-side temporary identifier of an added row
pub const PHANTOM_ID_FIELD: &str = "$PhantomId";

/// Changes submitted for one table in a single sync call
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SyncBatch {
    /// New rows, each keyed by a phantom identifier
    #[serde(default)]
    pub added: Option<Vec<Record>>,
    /// Rows to delete, keyed by real identifier
    #[serde(default)]
    pub removed: Option<Vec<RemovedRecord>>,
    /// Rows to modify, keyed by real identifier
    #[serde(default)]
    pub updated: Option<Vec<UpdatedRecord>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemovedRecord {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdatedRecord {
    pub id: i64,
    /// Changed columns
    #[serde(flatten)]
    pub fields: Record,
}

/// Tells the client which identifier the database assigned to a phantom row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhantomMapping {
    #[serde(rename = "$PhantomId", skip_serializing_if = "Option::is_none")]
    pub phantom_id: Option<Value>,
    pub id: i64,
}
