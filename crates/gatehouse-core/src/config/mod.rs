pub mod logging_config;
pub mod route_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{GateError, GateResult};

pub use logging_config::LoggingConfig;
pub use route_config::{LoadingMessages, RouteConfig};

/// Top-level configuration for every gate in the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GateConfig {
    pub routes: RouteConfig,
    pub messages: LoadingMessages,
    pub elevated: ElevatedConfig,
    pub logging: LoggingConfig,
}

impl GateConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> GateResult<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file on disk.
    pub fn load(path: &Path) -> GateResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| GateError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Reject configs whose redirect targets or role names cannot work.
    pub fn validate(&self) -> GateResult<()> {
        self.routes.validate()?;
        if self.elevated.role_name.trim().is_empty() {
            return Err(GateError::ConfigInvalid {
                field: "elevated.role_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Elevated-privilege (super-admin) gate settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatedConfig {
    /// Role-assignment record name queried for elevated access.
    pub role_name: String,
}

impl Default for ElevatedConfig {
    fn default() -> Self {
        Self {
            role_name: "super_admin".to_string(),
        }
    }
}
