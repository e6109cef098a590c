//! Shared fixtures: the `test_items` table and its schema.

#![allow(dead_code)]

use artifact_core::schema::{
    Column, ConflictAction, FilterOp, OrderColumn, TableSchema, TableSchemaBuilder,
};
use artifact_core::Record;
use rusqlite::Connection;

pub const TEST_ITEMS_DDL: &str = "
    CREATE TABLE test_items (
        id INTEGER PRIMARY KEY,
        evidence_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        value TEXT,
        score INTEGER DEFAULT 0,
        run_id TEXT,
        created_at TEXT
    )";

/// Same table with `name` unique, for conflict-action tests.
pub const UNIQUE_ITEMS_DDL: &str = "
    CREATE TABLE test_items (
        id INTEGER PRIMARY KEY,
        evidence_id INTEGER NOT NULL,
        name TEXT NOT NULL UNIQUE,
        value TEXT,
        score INTEGER DEFAULT 0,
        run_id TEXT,
        created_at TEXT
    )";

pub fn mem_db(ddl: &str) -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(ddl).unwrap();
    conn
}

/// Columns only; no whitelists.
pub fn items_builder() -> TableSchemaBuilder {
    TableSchema::builder("test_items")
        .column(Column::integer("id").auto_increment())
        .column(Column::integer("evidence_id").not_null())
        .column(Column::text("name").not_null())
        .column(Column::text("value"))
        .column(Column::integer("score").default_value(0))
        .column(Column::text("run_id"))
        .column(Column::text("created_at"))
}

pub fn test_schema() -> TableSchema {
    items_builder()
        .conflict_action(ConflictAction::Fail)
        .sortable(["id", "name", "score", "created_at"])
        .default_order([OrderColumn::desc("score")])
        .filterable("name", [FilterOp::Eq, FilterOp::Like, FilterOp::In])
        .filterable("score", [FilterOp::Eq, FilterOp::Gte, FilterOp::Lte])
        .filterable("run_id", [FilterOp::Eq])
        .supports_run_delete(true)
        .build()
        .unwrap()
}

pub fn item(name: &str, score: i64) -> Record {
    Record::new().with("name", name).with("score", score)
}

pub fn names(rows: &[Record]) -> Vec<String> {
    rows.iter()
        .map(|r| r.get_str("name").unwrap().to_string())
        .collect()
}
