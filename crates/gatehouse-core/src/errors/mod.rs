//! Error types for the gatehouse workspace (thiserror enums + error codes).

pub mod error_code;
mod gate_error;
mod lookup_error;

pub use gate_error::{GateError, GateResult, SourceClosed};
pub use lookup_error::LookupError;
