//! Declarative table metadata consumed by the storage engine.
//!
//! Every identifier the engine interpolates into SQL comes from here.

pub mod catalog;
pub mod column;
pub mod filter;
pub mod order;
pub mod registry;
pub mod table;

pub use column::{Column, StorageType};
pub use filter::{Filter, FilterColumn, FilterOp, FilterSpec};
pub use order::{Direction, OrderColumn};
pub use registry::SchemaRegistry;
pub use table::{
    is_identifier, ConflictAction, RecordHook, TableSchema, TableSchemaBuilder,
    EVIDENCE_ID_COLUMN, RUN_ID_COLUMN,
};
