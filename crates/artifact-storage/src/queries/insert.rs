//! Insert path: normalize, then execute one prepared statement per row.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use tracing::{debug, warn};

use artifact_core::errors::StorageResult;
use artifact_core::schema::TableSchema;
use artifact_core::Record;

use crate::normalize::insert_params;
use crate::sql;

const SAVEPOINT: &str = "insert_rows";

fn execute_all(conn: &Connection, statement: &str, rows: &[Vec<Value>]) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare_cached(statement)?;
    let mut applied = 0;
    for params in rows {
        applied += stmt.execute(params_from_iter(params.iter()))?;
    }
    Ok(applied)
}

/// Insert a batch of records under `evidence_id` atomically.
///
/// Opens a transaction when the connection is in autocommit mode. Inside a
/// caller's transaction the batch runs under a savepoint, so a failed batch
/// leaves nothing behind for the caller to commit. Returns the number of
/// records submitted, which under `INSERT OR IGNORE` may exceed the rows
/// written.
pub fn insert_rows<I>(
    conn: &Connection,
    schema: &TableSchema,
    evidence_id: i64,
    records: I,
) -> StorageResult<usize>
where
    I: IntoIterator<Item = Record>,
{
    let rows: Vec<_> = records
        .into_iter()
        .map(|record| insert_params(schema, evidence_id, record))
        .collect();
    if rows.is_empty() {
        return Ok(0);
    }

    let statement = sql::insert(schema);
    debug!(
        table = schema.name(),
        sql = %statement,
        rows = rows.len(),
        "insert_rows"
    );

    let applied = if conn.is_autocommit() {
        let tx = conn.unchecked_transaction()?;
        let applied = execute_all(conn, &statement, &rows)?;
        tx.commit()?;
        applied
    } else {
        conn.execute_batch(&format!("SAVEPOINT {SAVEPOINT}"))?;
        match execute_all(conn, &statement, &rows) {
            Ok(applied) => {
                conn.execute_batch(&format!("RELEASE {SAVEPOINT}"))?;
                applied
            }
            Err(err) => {
                let undo = format!("ROLLBACK TO {SAVEPOINT}; RELEASE {SAVEPOINT}");
                if let Err(undo_err) = conn.execute_batch(&undo) {
                    warn!(table = schema.name(), error = %undo_err, "savepoint rollback failed");
                }
                return Err(err.into());
            }
        }
    };

    debug!(
        table = schema.name(),
        submitted = rows.len(),
        applied,
        "rows inserted"
    );
    Ok(rows.len())
}

/// Insert one record and return `last_insert_rowid()`.
///
/// When the conflict action drops the row (`INSERT OR IGNORE` on a duplicate)
/// nothing is written and the returned id is the connection's previous
/// `last_insert_rowid()`, which belongs to an earlier insert.
pub fn insert_row(
    conn: &Connection,
    schema: &TableSchema,
    evidence_id: i64,
    record: Record,
) -> StorageResult<i64> {
    let params = insert_params(schema, evidence_id, record);
    let statement = sql::insert(schema);
    debug!(
        table = schema.name(),
        sql = %statement,
        params = params.len(),
        "insert_row"
    );

    let mut stmt = conn.prepare_cached(&statement)?;
    if stmt.execute(params_from_iter(params.iter()))? == 0 {
        debug!(table = schema.name(), "insert_row dropped by conflict action");
    }
    Ok(conn.last_insert_rowid())
}
