//! Errors returned by the CRUD operations.

use super::error_code::{self, ErrorCode};
use super::validation_error::ValidationError;

/// Either a validation failure (nothing was executed) or the store's own
/// error, carried unmodified.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StorageError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Sqlite(_) => None,
        }
    }

    /// The untouched store error, if this is one.
    pub fn as_sqlite(&self) -> Option<&rusqlite::Error> {
        match self {
            Self::Sqlite(e) => Some(e),
            Self::Validation(_) => None,
        }
    }

    /// SQLite primary result code, when the store reported one.
    pub fn sqlite_code(&self) -> Option<rusqlite::ErrorCode> {
        self.as_sqlite().and_then(|e| e.sqlite_error_code())
    }
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::Sqlite(_) => match self.sqlite_code() {
                Some(rusqlite::ErrorCode::ConstraintViolation) => error_code::SQLITE_CONSTRAINT,
                Some(rusqlite::ErrorCode::DatabaseBusy)
                | Some(rusqlite::ErrorCode::DatabaseLocked) => error_code::DB_BUSY,
                Some(rusqlite::ErrorCode::DatabaseCorrupt)
                | Some(rusqlite::ErrorCode::NotADatabase) => error_code::DB_CORRUPT,
                Some(rusqlite::ErrorCode::DiskFull) => error_code::DISK_FULL,
                _ => error_code::STORAGE_ERROR,
            },
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
