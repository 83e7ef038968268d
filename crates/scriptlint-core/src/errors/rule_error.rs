//! Errors a rule may return from one analysis call.

use super::error_code::{self, ScriptLintErrorCode};

/// Failure reported by a rule. The executor records it and carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("rule failed: {message}")]
    Failed { message: String },

    #[error("command metadata unavailable: {0}")]
    Metadata(String),
}

impl RuleError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

impl ScriptLintErrorCode for RuleError {
    fn error_code(&self) -> &'static str {
        error_code::RULE_FAILED
    }
}
