//! Analyzer assembly: providers → duplicate check → selection → pool.

use std::sync::Arc;

use scriptlint_core::config::ScriptLintConfig;
use scriptlint_core::errors::ConfigError;
use scriptlint_core::types::collections::FxHashSet;

use super::ScriptAnalyzer;
use crate::engine::parallel::build_rule_pool;
use crate::parser::{ScriptParser, StandardParser};
use crate::rules::{BuiltinRuleProvider, RuleProvider};
use crate::suppression::CommentPragmaParser;

pub struct ScriptAnalyzerBuilder {
    config: ScriptLintConfig,
    providers: Vec<Box<dyn RuleProvider>>,
    builtin: Option<BuiltinRuleProvider>,
    parser: Arc<dyn ScriptParser>,
}

impl Default for ScriptAnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptAnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            config: ScriptLintConfig::default(),
            providers: Vec::new(),
            builtin: Some(BuiltinRuleProvider::new()),
            parser: Arc::new(StandardParser),
        }
    }

    pub fn with_config(mut self, config: ScriptLintConfig) -> Self {
        self.config = config;
        self
    }

    /// Add rules from another provider, alongside the built-in ones.
    pub fn with_provider(mut self, provider: impl RuleProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Replace the built-in provider, e.g. to inject a command store.
    pub fn with_builtin_provider(mut self, provider: BuiltinRuleProvider) -> Self {
        self.builtin = Some(provider);
        self
    }

    pub fn without_builtin_rules(mut self) -> Self {
        self.builtin = None;
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn ScriptParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn build(self) -> Result<ScriptAnalyzer, ConfigError> {
        self.config.validate()?;
        let analyzer_config = &self.config.analyzer;
        let selector = analyzer_config.compile_patterns()?;

        let mut providers: Vec<&dyn RuleProvider> = Vec::with_capacity(self.providers.len() + 1);
        if let Some(builtin) = &self.builtin {
            providers.push(builtin);
        }
        for provider in &self.providers {
            providers.push(provider.as_ref());
        }

        let mut seen = FxHashSet::default();
        let mut rules = Vec::new();
        for provider in providers {
            for rule in provider.rules(&self.config)? {
                let info = rule.info();
                let full_name = info.full_name();
                if !seen.insert(full_name.to_ascii_lowercase()) {
                    return Err(ConfigError::DuplicateRule { full_name });
                }
                if selector.selects(info) && analyzer_config.rule_enabled(info) {
                    rules.push(rule);
                } else {
                    tracing::trace!(rule = %full_name, provider = provider.name(), "rule not selected");
                }
            }
        }

        let pool = if analyzer_config.effective_parallel() {
            let pool = build_rule_pool(analyzer_config.effective_threads()).map_err(|e| {
                ConfigError::InvalidValue {
                    field: "analyzer.threads".to_string(),
                    message: e.to_string(),
                }
            })?;
            Some(Arc::new(pool))
        } else {
            None
        };

        tracing::info!(
            rules = rules.len(),
            parallel = pool.is_some(),
            "analyzer ready"
        );
        Ok(ScriptAnalyzer {
            pragmas: CommentPragmaParser::new(analyzer_config.effective_suppression_marker()),
            config: self.config,
            parser: self.parser,
            rules,
            pool,
        })
    }
}
