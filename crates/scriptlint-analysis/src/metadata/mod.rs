//! Command metadata: a read-only lookup service injected into rules.

pub mod cached;
pub mod store;

use std::sync::Arc;

use scriptlint_core::errors::RuleError;
use serde::{Deserialize, Serialize};

pub use cached::{CacheStats, CachedCommandStore};
pub use store::InMemoryCommandStore;

/// What the engine knows about one command.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandMetadata {
    pub name: String,
    pub aliases: Vec<String>,
    pub parameters: Vec<String>,
    /// Platforms the command exists on. Empty means every platform.
    pub platforms: Vec<String>,
}

impl CommandMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_parameters(mut self, parameters: &[&str]) -> Self {
        self.parameters = parameters.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_platforms(mut self, platforms: &[&str]) -> Self {
        self.platforms = platforms.iter().map(|p| p.to_string()).collect();
        self
    }

    /// True when the command exists on every platform in `platforms`.
    pub fn available_on(&self, platforms: &[String]) -> bool {
        self.platforms.is_empty()
            || platforms
                .iter()
                .all(|p| self.platforms.iter().any(|q| q.eq_ignore_ascii_case(p)))
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        let name = name.trim_start_matches('-');
        self.parameters.iter().any(|p| p.eq_ignore_ascii_case(name))
    }
}

/// Keyed, read-only command lookup. Shared by concurrently running rules.
pub trait CommandMetadataStore: Send + Sync {
    /// Metadata for `name` if the command exists on all of `platforms`
    /// (empty = any platform).
    fn lookup(
        &self,
        name: &str,
        platforms: &[String],
    ) -> Result<Option<Arc<CommandMetadata>>, RuleError>;

    /// Command `name` is an alias of, if it is one.
    fn alias_target(&self, name: &str) -> Result<Option<String>, RuleError>;
}

impl<S: CommandMetadataStore + ?Sized> CommandMetadataStore for Arc<S> {
    fn lookup(
        &self,
        name: &str,
        platforms: &[String],
    ) -> Result<Option<Arc<CommandMetadata>>, RuleError> {
        (**self).lookup(name, platforms)
    }

    fn alias_target(&self, name: &str) -> Result<Option<String>, RuleError> {
        (**self).alias_target(name)
    }
}
