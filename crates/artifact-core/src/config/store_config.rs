//! Connection PRAGMA configuration.

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};

const JOURNAL_MODES: &[&str] = &["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];
const SYNCHRONOUS_LEVELS: &[&str] = &["OFF", "NORMAL", "FULL", "EXTRA"];

/// PRAGMAs applied to a caller-owned connection by
/// `artifact_storage::pragmas::configure_connection`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Milliseconds to wait on a locked database before failing with SQLITE_BUSY.
    pub busy_timeout_ms: u32,
    /// One of DELETE, TRUNCATE, PERSIST, MEMORY, WAL, OFF.
    pub journal_mode: String,
    /// One of OFF, NORMAL, FULL, EXTRA.
    pub synchronous: String,
    pub foreign_keys: bool,
    /// Page cache size in KiB.
    pub cache_size_kib: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5000,
            journal_mode: "WAL".to_string(),
            synchronous: "NORMAL".to_string(),
            foreign_keys: true,
            cache_size_kib: 8000,
        }
    }
}

impl StoreConfig {
    /// Render the PRAGMA batch. Keyword settings are checked against SQLite's
    /// accepted values since PRAGMA arguments cannot be bound.
    pub fn pragma_batch(&self) -> ValidationResult<String> {
        let journal_mode = keyword("journal_mode", &self.journal_mode, JOURNAL_MODES)?;
        let synchronous = keyword("synchronous", &self.synchronous, SYNCHRONOUS_LEVELS)?;
        Ok(format!(
            "PRAGMA journal_mode = {journal_mode};
             PRAGMA synchronous = {synchronous};
             PRAGMA foreign_keys = {};
             PRAGMA busy_timeout = {};
             PRAGMA cache_size = -{};",
            if self.foreign_keys { "ON" } else { "OFF" },
            self.busy_timeout_ms,
            self.cache_size_kib,
        ))
    }
}

fn keyword(setting: &str, value: &str, allowed: &[&'static str]) -> ValidationResult<&'static str> {
    allowed
        .iter()
        .copied()
        .find(|k| k.eq_ignore_ascii_case(value.trim()))
        .ok_or_else(|| ValidationError::InvalidConfig {
            setting: setting.to_string(),
            value: value.to_string(),
        })
}
