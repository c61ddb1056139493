//! Applies client sync batches to the store and reads full snapshots back.
//!
//! A batch is applied in three strictly ordered phases: added rows are
//! inserted, then removed rows deleted with a single statement, then updated
//! rows written one statement per row. Statements inside a phase may run
//! concurrently. Nothing is wrapped in a transaction: a failure stops the
//! remaining statements but keeps whatever already ran.

use futures_util::future::try_join_all;
use serde_json::Value;
use tracing::debug;

use crate::db::{Database, ScheduleRepository, SqliteScheduleRepository, Table};
use crate::error::Result;
use crate::models::{
    PhantomMapping, Record, RemovedRecord, ResourceDetails, SyncBatch, UpdatedRecord,
    PHANTOM_ID_FIELD,
};

/// Field holding recurrence exclusions, persisted as JSON text
pub const EXCEPTION_DATES_FIELD: &str = "exceptionDates";

/// Every resource and event row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub resources: Vec<Record>,
    pub events: Vec<Record>,
}

/// Fetch both tables concurrently
pub async fn load_snapshot(db: &Database) -> Result<Snapshot> {
    let (resources, events) = tokio::try_join!(
        load_table(db, Table::Resources),
        load_table(db, Table::Events)
    )?;
    Ok(Snapshot { resources, events })
}

async fn load_table(db: &Database, table: Table) -> Result<Vec<Record>> {
    db.call(move |conn| SqliteScheduleRepository::new(conn).load(table))
        .await
}

/// Apply one table's batch, returning identifier mappings when rows were added
pub async fn apply_table_changes(
    db: &Database,
    table: Table,
    batch: SyncBatch,
) -> Result<Option<Vec<PhantomMapping>>> {
    let mut mappings = None;

    if let Some(added) = batch.added {
        debug!(%table, count = added.len(), "inserting added rows");
        mappings = Some(create_rows(db, table, added).await?);
    }
    if let Some(removed) = batch.removed {
        debug!(%table, count = removed.len(), "deleting removed rows");
        delete_rows(db, table, removed).await?;
    }
    if let Some(updated) = batch.updated {
        debug!(%table, count = updated.len(), "updating rows");
        update_rows(db, table, updated).await?;
    }

    Ok(mappings.filter(|rows| !rows.is_empty()))
}

/// Look up the side-table details of a resource
pub async fn resource_details(
    db: &Database,
    resource_id: String,
) -> Result<Option<ResourceDetails>> {
    db.call(move |conn| SqliteScheduleRepository::new(conn).resource_details(&resource_id))
        .await
}

async fn create_rows(db: &Database, table: Table, added: Vec<Record>) -> Result<Vec<PhantomMapping>> {
    try_join_all(added.into_iter().map(|record| create_row(db, table, record))).await
}

async fn create_row(db: &Database, table: Table, mut record: Record) -> Result<PhantomMapping> {
    let phantom_id = record.remove(PHANTOM_ID_FIELD);
    // identifiers are always assigned by the database
    record.remove("id");
    let record = encode_exception_dates(table, record)?;

    let id = db
        .call(move |conn| SqliteScheduleRepository::new(conn).insert(table, &record))
        .await?;
    Ok(PhantomMapping { phantom_id, id })
}

async fn delete_rows(db: &Database, table: Table, removed: Vec<RemovedRecord>) -> Result<()> {
    let ids: Vec<i64> = removed.into_iter().map(|row| row.id).collect();
    db.call(move |conn| SqliteScheduleRepository::new(conn).delete(table, &ids))
        .await?;
    Ok(())
}

async fn update_rows(db: &Database, table: Table, updated: Vec<UpdatedRecord>) -> Result<()> {
    try_join_all(updated.into_iter().map(|row| update_row(db, table, row))).await?;
    Ok(())
}

async fn update_row(db: &Database, table: Table, row: UpdatedRecord) -> Result<()> {
    let UpdatedRecord { id, fields } = row;
    let fields = encode_exception_dates(table, fields)?;
    db.call(move |conn| SqliteScheduleRepository::new(conn).update(table, id, &fields))
        .await?;
    Ok(())
}

/// Replace `exceptionDates` with its JSON text, or drop it for tables
/// that do not store it. A null value clears the column.
fn encode_exception_dates(table: Table, mut record: Record) -> Result<Record> {
    let Some(dates) = record.remove(EXCEPTION_DATES_FIELD) else {
        return Ok(record);
    };
    if table.encodes_exception_dates() {
        let encoded = if dates.is_null() {
            Value::Null
        } else {
            Value::String(serde_json::to_string(&dates)?)
        };
        record.insert(EXCEPTION_DATES_FIELD.to_string(), encoded);
    }
    Ok(record)
}
