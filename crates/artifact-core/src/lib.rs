//! # artifact-core
//!
//! Foundation crate for the artifact store.
//! Defines the declarative table schema model, the record type, errors,
//! config and tracing setup. The storage engine crate depends on this.

pub mod config;
pub mod errors;
pub mod logging;
pub mod record;
pub mod schema;

// Re-export the most commonly used types at the crate root.
pub use config::EngineConfig;
pub use errors::error_code::ErrorCode;
pub use errors::{StorageError, StorageResult, ValidationError, ValidationResult};
pub use record::Record;
pub use schema::{
    Column, ConflictAction, Direction, Filter, FilterColumn, FilterOp, FilterSpec, OrderColumn,
    SchemaRegistry, StorageType, TableSchema, TableSchemaBuilder,
};

/// Re-exported so callers can build values without naming rusqlite directly.
pub use rusqlite::types::Value;
