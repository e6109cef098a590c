//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Settings for the `tracing` subscriber installed by [`crate::logging::init`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string. `RUST_LOG` takes precedence when set.
    pub filter: String,
    /// Emit ANSI colour codes.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            ansi: true,
        }
    }
}
