//! Error types for every scriptlint subsystem.
//! Each subsystem has its own enum; `AnalysisError` is the top-level error
//! that the others convert into.

pub mod error_code;

mod analysis_error;
mod config_error;
mod edit_error;
mod rule_error;

pub use analysis_error::{AnalysisError, AnalysisResult};
pub use config_error::ConfigError;
pub use edit_error::EditError;
pub use rule_error::RuleError;
