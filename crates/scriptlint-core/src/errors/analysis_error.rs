//! Top-level error for analyzer and formatter entry points.

use std::path::PathBuf;

use super::error_code::{self, ScriptLintErrorCode};
use super::{ConfigError, EditError};

/// Errors visible to callers of the analyzer and formatter. Rule failures are
/// never among them; those are collected as data.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("edit conflict: {0}")]
    Edit(#[from] EditError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScriptLintErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Edit(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Io { .. } => error_code::IO_ERROR,
        }
    }
}

/// Convenience type alias.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
