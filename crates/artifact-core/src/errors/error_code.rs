//! Stable string codes for presenting errors to higher layers.

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const INVALID_SCHEMA: &str = "INVALID_SCHEMA";
pub const INVALID_CONFIG: &str = "INVALID_CONFIG";
pub const UNKNOWN_TABLE: &str = "UNKNOWN_TABLE";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const SQLITE_CONSTRAINT: &str = "SQLITE_CONSTRAINT";
pub const DB_BUSY: &str = "DB_BUSY";
pub const DB_CORRUPT: &str = "DB_CORRUPT";
pub const DISK_FULL: &str = "DISK_FULL";

/// Maps an error to one of the codes above.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}
