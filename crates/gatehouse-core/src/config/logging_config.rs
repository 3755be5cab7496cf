//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Controls the tracing subscriber installed by [`crate::tracing::init_tracing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `GATEHOUSE_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
