//! Configuration for the analyzer, formatter, and caches.

pub mod analyzer_config;
pub mod cache_config;
pub mod formatter_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub use analyzer_config::AnalyzerConfig;
pub use cache_config::CacheConfig;
pub use formatter_config::FormatterConfig;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScriptLintConfig {
    pub analyzer: AnalyzerConfig,
    pub formatter: FormatterConfig,
    pub cache: CacheConfig,
}

impl ScriptLintConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analyzer.compile_patterns()?;
        self.formatter.validate()?;
        self.cache.validate()?;
        Ok(())
    }
}
