//! Explicit rule registration.
//!
//! Every built-in rule appears once in [`BUILTIN_RULES`] with its constant
//! [`RuleInfo`] and a constructor. Providers hand finished rule instances to
//! the analyzer.

use std::sync::Arc;

use scriptlint_core::config::{FormatterConfig, ScriptLintConfig};
use scriptlint_core::errors::ConfigError;
use scriptlint_core::rules::RuleInfo;

use super::avoid_aliases::AvoidUsingCmdletAliases;
use super::duplicate_functions::AvoidDuplicateFunctionDefinitions;
use super::formatting::FormattingRule;
use super::semicolons::AvoidSemicolonsAsLineTerminators;
use super::traits::ScriptRule;
use crate::metadata::{CachedCommandStore, CommandMetadataStore, InMemoryCommandStore};

/// Services rule constructors may draw on.
#[derive(Clone)]
pub struct RuleServices {
    pub commands: Arc<dyn CommandMetadataStore>,
    pub formatter: FormatterConfig,
}

/// Constructor for one rule from services and its `[analyzer.rules.<name>]`
/// table.
pub type RuleBuilder =
    fn(&RuleServices, Option<&toml::Table>) -> Result<Arc<dyn ScriptRule>, ConfigError>;

/// One registration-table entry.
#[derive(Clone, Copy)]
pub struct RuleDescriptor {
    pub info: &'static RuleInfo,
    pub build: RuleBuilder,
}

/// Source of rule instances for an analyzer.
pub trait RuleProvider: Send + Sync {
    fn name(&self) -> &str;

    fn rules(&self, config: &ScriptLintConfig) -> Result<Vec<Arc<dyn ScriptRule>>, ConfigError>;
}

pub static BUILTIN_RULES: &[RuleDescriptor] = &[
    RuleDescriptor {
        info: &AvoidUsingCmdletAliases::INFO,
        build: AvoidUsingCmdletAliases::build,
    },
    RuleDescriptor {
        info: &AvoidDuplicateFunctionDefinitions::INFO,
        build: AvoidDuplicateFunctionDefinitions::build,
    },
    RuleDescriptor {
        info: &AvoidSemicolonsAsLineTerminators::INFO,
        build: AvoidSemicolonsAsLineTerminators::build,
    },
    RuleDescriptor {
        info: &FormattingRule::PLACE_OPEN_BRACE,
        build: FormattingRule::build_place_open_brace,
    },
    RuleDescriptor {
        info: &FormattingRule::USE_CONSISTENT_INDENTATION,
        build: FormattingRule::build_use_consistent_indentation,
    },
    RuleDescriptor {
        info: &FormattingRule::AVOID_TRAILING_WHITESPACE,
        build: FormattingRule::build_avoid_trailing_whitespace,
    },
];

/// Builds every rule in [`BUILTIN_RULES`].
///
/// Without an explicit store, commands resolve through a cached built-in
/// table sized by `[cache]`.
#[derive(Default, Clone)]
pub struct BuiltinRuleProvider {
    commands: Option<Arc<dyn CommandMetadataStore>>,
}

impl BuiltinRuleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command_store(mut self, store: Arc<dyn CommandMetadataStore>) -> Self {
        self.commands = Some(store);
        self
    }

    pub fn descriptors(&self) -> &'static [RuleDescriptor] {
        BUILTIN_RULES
    }

    fn services(&self, config: &ScriptLintConfig) -> Result<RuleServices, ConfigError> {
        let commands: Arc<dyn CommandMetadataStore> = match &self.commands {
            Some(store) => Arc::clone(store),
            None => Arc::new(CachedCommandStore::new(
                InMemoryCommandStore::builtin(),
                &config.cache,
            )?),
        };
        Ok(RuleServices {
            commands,
            formatter: config.formatter.clone(),
        })
    }
}

impl RuleProvider for BuiltinRuleProvider {
    fn name(&self) -> &str {
        "builtin"
    }

    fn rules(&self, config: &ScriptLintConfig) -> Result<Vec<Arc<dyn ScriptRule>>, ConfigError> {
        let services = self.services(config)?;
        BUILTIN_RULES
            .iter()
            .map(|d| (d.build)(&services, config.analyzer.rule_args(d.info)))
            .collect()
    }
}

/// Read an optional typed argument, reporting a type mismatch.
pub(crate) fn arg<'a, T>(
    args: Option<&'a toml::Table>,
    rule: &RuleInfo,
    key: &str,
    convert: impl FnOnce(&'a toml::Value) -> Option<T>,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = args.and_then(|t| t.get(key)) else {
        return Ok(None);
    };
    convert(value)
        .map(Some)
        .ok_or_else(|| ConfigError::InvalidValue {
            field: format!("analyzer.rules.{}.{key}", rule.name),
            message: format!("unexpected value {value}"),
        })
}
