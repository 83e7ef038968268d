//! Formatter configuration.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Configuration for the formatting editors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub indent_size: usize,
    pub use_tabs: bool,
    pub open_brace_on_same_line: bool,
    pub trim_trailing_whitespace: bool,
    /// Explicit editor order. Empty means the default pipeline.
    pub editors: Vec<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            indent_size: 4,
            use_tabs: false,
            open_brace_on_same_line: true,
            trim_trailing_whitespace: true,
            editors: Vec::new(),
        }
    }
}

impl FormatterConfig {
    /// One level of indentation.
    pub fn indent_unit(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indent_size)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.use_tabs && self.indent_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "formatter.indent_size".to_string(),
                message: "must be at least 1 when indenting with spaces".to_string(),
            });
        }
        Ok(())
    }
}
