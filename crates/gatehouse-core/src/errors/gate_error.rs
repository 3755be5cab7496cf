//! Configuration and wiring errors.
//!
//! Gates themselves never return errors: every runtime failure is folded into
//! the denial branch. These errors cover setup (config, route tables, section
//! tables) only.

use super::error_code::{self, GateErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Config parse failed: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Cannot read config file {path}: {source}")]
    ConfigIo {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config: {field}: {reason}")]
    ConfigInvalid { field: String, reason: String },

    #[error("Invalid route path: {path}")]
    InvalidRoute { path: String },

    #[error("Unknown role: {name}")]
    InvalidRole { name: String },

    #[error("Section access table is malformed: {0}")]
    SectionTable(#[from] serde_json::Error),

    #[error(transparent)]
    SourceClosed(#[from] SourceClosed),
}

impl GateErrorCode for GateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => error_code::CONFIG_PARSE,
            Self::ConfigIo { .. } => error_code::CONFIG_IO,
            Self::ConfigInvalid { .. } => error_code::CONFIG_INVALID,
            Self::InvalidRoute { .. } => error_code::INVALID_ROUTE,
            Self::InvalidRole { .. } => error_code::INVALID_ROLE,
            Self::SectionTable(_) => error_code::SECTION_TABLE_INVALID,
            Self::SourceClosed(e) => e.error_code(),
        }
    }
}

/// The writer side of a source was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Source closed: {source_name}")]
pub struct SourceClosed {
    pub source_name: &'static str,
}

impl GateErrorCode for SourceClosed {
    fn error_code(&self) -> &'static str {
        error_code::SOURCE_CLOSED
    }
}

/// Convenience type alias.
pub type GateResult<T> = Result<T, GateError>;
