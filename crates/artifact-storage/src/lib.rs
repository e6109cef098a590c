//! # artifact-storage
//!
//! Generic CRUD engine for schema-described SQLite tables.
//! Every operation takes `(conn, schema, evidence_id, ...)`, validates the
//! caller's identifiers against the schema whitelists, builds a parameterized
//! statement and runs it on the caller's connection. No pooling, no
//! migrations, no background work.

pub mod normalize;
pub mod pragmas;
pub mod queries;
pub mod sql;
pub mod validate;

pub use queries::{
    delete_by_run, get_count, get_distinct_values, get_rows, insert_row, insert_rows, RowQuery,
};
