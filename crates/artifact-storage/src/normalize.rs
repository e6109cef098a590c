//! Record normalization for the insert path.
//!
//! Order: pre-insert hook, then defaults for absent columns, then the
//! `evidence_id` stamp. Record fields that are not declared columns are
//! dropped by the projection.

use rusqlite::types::Value;

use artifact_core::schema::{TableSchema, EVIDENCE_ID_COLUMN};
use artifact_core::Record;

/// Apply the hook, fill defaults and stamp the partition key.
pub fn normalize(schema: &TableSchema, evidence_id: i64, record: Record) -> Record {
    let mut record = match schema.pre_insert_hook() {
        Some(hook) => hook(record),
        None => record,
    };

    for column in schema.insert_columns() {
        if column.name() == EVIDENCE_ID_COLUMN {
            continue;
        }
        let key = column.record_key();
        if !record.contains_key(key) {
            record.insert(key, column.default().cloned().unwrap_or(Value::Null));
        }
    }

    record.insert(EVIDENCE_ID_COLUMN, evidence_id);
    record
}

/// Positional parameters for [`crate::sql::insert`], one per insert column.
pub fn insert_params(schema: &TableSchema, evidence_id: i64, record: Record) -> Vec<Value> {
    let mut record = normalize(schema, evidence_id, record);
    schema
        .insert_columns()
        .map(|column| {
            if column.name() == EVIDENCE_ID_COLUMN {
                Value::Integer(evidence_id)
            } else {
                record.remove(column.record_key()).unwrap_or(Value::Null)
            }
        })
        .collect()
}
