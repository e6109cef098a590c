//! Error types for the artifact store.
//!
//! Two classes only: validation errors (caller-fixable misuse, raised before
//! any SQL runs) and store errors (whatever SQLite reports, passed through).

pub mod error_code;
pub mod storage_error;
pub mod validation_error;

pub use storage_error::{StorageError, StorageResult};
pub use validation_error::{ValidationError, ValidationResult};
