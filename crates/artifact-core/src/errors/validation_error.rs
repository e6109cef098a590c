//! Validation errors: malformed call sites and malformed schemas.
//!
//! Every message names the offending column, operator or table so the
//! misconfigured call site can be found from the log line alone.

use super::error_code::{self, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{column} is not filterable on table '{table}'")]
    NotFilterable { table: String, column: String },

    #[error("{op} is not allowed for {column} on table '{table}'")]
    OperatorNotAllowed {
        table: String,
        column: String,
        op: String,
    },

    #[error("{column} is not allowed for ORDER BY on table '{table}'")]
    NotSortable { table: String, column: String },

    #[error("{column} is not allowed for DISTINCT on table '{table}'")]
    NotDistinct { table: String, column: String },

    #[error("{table} does not support run-based deletion")]
    RunDeleteUnsupported { table: String },

    #[error("invalid sort direction '{direction}' (expected ASC or DESC)")]
    InvalidDirection { direction: String },

    #[error("unknown filter operator '{op}'")]
    UnknownOperator { op: String },

    #[error("unknown table '{table}'")]
    UnknownTable { table: String },

    #[error("table '{table}' is already registered")]
    DuplicateTable { table: String },

    #[error("invalid schema for table '{table}': {reason}")]
    InvalidSchema { table: String, reason: String },

    #[error("invalid value '{value}' for config setting {setting}")]
    InvalidConfig { setting: String, value: String },
}

impl ValidationError {
    pub(crate) fn schema(table: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSchema { .. } | Self::DuplicateTable { .. } => error_code::INVALID_SCHEMA,
            Self::InvalidConfig { .. } => error_code::INVALID_CONFIG,
            Self::UnknownTable { .. } => error_code::UNKNOWN_TABLE,
            _ => error_code::VALIDATION_ERROR,
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;
