//! Cache sizing.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Sizing for the command metadata cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub command_cache_capacity: usize,
    /// Share of capacity given to the probation segment, in (0, 1].
    pub probation_ratio: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            command_cache_capacity: 256,
            probation_ratio: 0.2,
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_cache_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.command_cache_capacity".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !(self.probation_ratio > 0.0 && self.probation_ratio <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "cache.probation_ratio".to_string(),
                message: format!("{} is outside (0, 1]", self.probation_ratio),
            });
        }
        Ok(())
    }
}
