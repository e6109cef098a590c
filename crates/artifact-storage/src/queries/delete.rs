//! Run-scoped deletion for re-ingestion.

use rusqlite::{params_from_iter, Connection};
use tracing::debug;

use artifact_core::errors::StorageResult;
use artifact_core::schema::TableSchema;

use crate::sql;
use crate::validate::validate_run_delete;

/// Delete every row of `evidence_id` written by `run_id`. Returns the number
/// of rows removed; deleting a run twice removes nothing the second time.
pub fn delete_by_run(
    conn: &Connection,
    schema: &TableSchema,
    evidence_id: i64,
    run_id: &str,
) -> StorageResult<usize> {
    validate_run_delete(schema)?;
    let statement = sql::delete_by_run(schema, evidence_id, run_id);

    let mut stmt = conn.prepare_cached(&statement.sql)?;
    let deleted = stmt.execute(params_from_iter(statement.params.iter()))?;
    debug!(table = schema.name(), deleted, "delete_by_run");
    Ok(deleted)
}
