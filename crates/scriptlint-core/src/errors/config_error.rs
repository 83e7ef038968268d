//! Configuration errors.

use super::error_code::{self, ScriptLintErrorCode};

/// Errors raised while loading configuration or building an analyzer or
/// formatter from it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid rule pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("duplicate rule registration: {full_name}")]
    DuplicateRule { full_name: String },

    #[error("unknown editor: {0}")]
    UnknownEditor(String),

    #[error("missing service for editor {editor}: {service}")]
    MissingService { editor: String, service: String },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ScriptLintErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => error_code::IO_ERROR,
            Self::InvalidPattern { .. } => "CONFIG_INVALID_PATTERN",
            Self::DuplicateRule { .. } => "CONFIG_DUPLICATE_RULE",
            Self::UnknownEditor(_) => "CONFIG_UNKNOWN_EDITOR",
            Self::MissingService { .. } => "CONFIG_MISSING_SERVICE",
            _ => error_code::CONFIG_ERROR,
        }
    }
}
