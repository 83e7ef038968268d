//! Stable error codes surfaced to calling tools.

pub const EDIT_OVERLAP: &str = "EDIT_OVERLAP";
pub const EDIT_OUT_OF_BOUNDS: &str = "EDIT_OUT_OF_BOUNDS";
pub const EDIT_NOT_CHAR_BOUNDARY: &str = "EDIT_NOT_CHAR_BOUNDARY";
pub const RULE_FAILED: &str = "RULE_FAILED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const IO_ERROR: &str = "IO_ERROR";

/// Maps an error to a stable, SCREAMING_CASE code.
pub trait ScriptLintErrorCode {
    fn error_code(&self) -> &'static str;
}
