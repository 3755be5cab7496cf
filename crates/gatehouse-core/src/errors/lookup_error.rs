//! Errors from the elevated-privilege role lookup.
//!
//! These never reach the user. The elevated gate logs them and treats the
//! check as a denial.

use super::error_code::{self, GateErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Role lookup backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Role lookup query failed: {message}")]
    QueryFailed { message: String },

    #[error("Role lookup timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}

impl GateErrorCode for LookupError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => error_code::LOOKUP_UNAVAILABLE,
            Self::QueryFailed { .. } => error_code::LOOKUP_FAILED,
            Self::Timeout { .. } => error_code::LOOKUP_TIMEOUT,
        }
    }
}
