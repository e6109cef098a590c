//! Column declarations.

use std::fmt;

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::record::IntoValue;

/// Logical storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StorageType {
    Integer,
    Text,
    Blob,
    Real,
}

impl StorageType {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
            Self::Real => "REAL",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One declared column. Nullable with no default unless stated otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    storage_type: StorageType,
    nullable: bool,
    default: Option<Value>,
    dict_key: Option<String>,
    exclude_from_select: bool,
    auto_increment: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, storage_type: StorageType) -> Self {
        Self {
            name: name.into(),
            storage_type,
            nullable: true,
            default: None,
            dict_key: None,
            exclude_from_select: false,
            auto_increment: false,
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, StorageType::Integer)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, StorageType::Text)
    }

    pub fn blob(name: impl Into<String>) -> Self {
        Self::new(name, StorageType::Blob)
    }

    pub fn real(name: impl Into<String>) -> Self {
        Self::new(name, StorageType::Real)
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Value used when an inserted record lacks this column.
    pub fn default_value(mut self, value: impl IntoValue) -> Self {
        self.default = Some(value.into_value());
        self
    }

    /// Read the inserted value from record key `key` instead of the column name.
    pub fn dict_key(mut self, key: impl Into<String>) -> Self {
        self.dict_key = Some(key.into());
        self
    }

    /// Omit from `get_rows` output unless excluded columns are requested.
    pub fn exclude_from_select(mut self) -> Self {
        self.exclude_from_select = true;
        self
    }

    /// Store-assigned row id; never written by the insert path.
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self.nullable = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The record key the insert path reads: `dict_key` if set, else `name`.
    pub fn record_key(&self) -> &str {
        self.dict_key.as_deref().unwrap_or(&self.name)
    }

    pub fn is_excluded_from_select(&self) -> bool {
        self.exclude_from_select
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }
}
