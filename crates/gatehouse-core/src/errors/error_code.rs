//! Stable machine-readable error codes.

/// Implemented by every error enum so callers can branch on a stable code
/// instead of a display string.
pub trait GateErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const CONFIG_PARSE: &str = "CONFIG_PARSE";
pub const CONFIG_IO: &str = "CONFIG_IO";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const INVALID_ROUTE: &str = "INVALID_ROUTE";
pub const INVALID_ROLE: &str = "INVALID_ROLE";
pub const SECTION_TABLE_INVALID: &str = "SECTION_TABLE_INVALID";
pub const SOURCE_CLOSED: &str = "SOURCE_CLOSED";
pub const LOOKUP_UNAVAILABLE: &str = "LOOKUP_UNAVAILABLE";
pub const LOOKUP_FAILED: &str = "LOOKUP_FAILED";
pub const LOOKUP_TIMEOUT: &str = "LOOKUP_TIMEOUT";
