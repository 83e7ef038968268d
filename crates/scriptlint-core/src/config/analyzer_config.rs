//! Analyzer configuration: rule selection, severity filter, execution policy.

use std::collections::BTreeMap;

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};

use crate::diagnostics::DiagnosticSeverity;
use crate::errors::ConfigError;
use crate::rules::RuleInfo;

/// Configuration for rule selection and execution.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Glob patterns over rule names. Empty means every rule.
    pub include_rules: Vec<String>,
    /// Glob patterns over rule names, applied after `include_rules`.
    pub exclude_rules: Vec<String>,
    /// Severities to report. Empty means every severity.
    pub severity: Vec<DiagnosticSeverity>,
    /// Run threadsafe rules on a worker pool. Default: true.
    pub parallel: Option<bool>,
    /// Worker pool size. 0 = available hardware parallelism.
    pub threads: Option<usize>,
    /// Keyword preceding `-suppress` in pragma comments. Default: "scriptlint".
    pub suppression_marker: Option<String>,
    /// Upper bound on analyze/apply rounds in fix mode. Default: 10.
    pub max_fix_passes: Option<usize>,
    /// Per-rule arguments keyed by rule name. `enable = false` turns a rule off.
    pub rules: BTreeMap<String, toml::Table>,
}

/// Compiled include/exclude patterns.
#[derive(Debug, Clone, Default)]
pub struct RuleSelector {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

impl RuleSelector {
    /// True when `rule` passes the include list and is not excluded.
    pub fn selects(&self, rule: &RuleInfo) -> bool {
        let full = rule.full_name();
        let prefixed = rule.prefixed_name();
        let hit = |p: &Pattern| {
            p.matches_with(rule.name, MATCH_OPTIONS)
                || p.matches_with(&full, MATCH_OPTIONS)
                || p.matches_with(&prefixed, MATCH_OPTIONS)
        };
        let included = self.include.is_empty() || self.include.iter().any(hit);
        included && !self.exclude.iter().any(hit)
    }
}

impl AnalyzerConfig {
    /// Returns whether threadsafe rules run in parallel, defaulting to true.
    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    /// Returns the effective worker count, defaulting to 0 (auto-detect).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    /// Returns the pragma marker, defaulting to "scriptlint".
    pub fn effective_suppression_marker(&self) -> &str {
        self.suppression_marker.as_deref().unwrap_or("scriptlint")
    }

    /// Returns the fix pass limit, defaulting to 10.
    pub fn effective_max_fix_passes(&self) -> usize {
        self.max_fix_passes.unwrap_or(10)
    }

    /// True when `severity` passes the severity filter.
    pub fn reports(&self, severity: DiagnosticSeverity) -> bool {
        self.severity.is_empty() || self.severity.contains(&severity)
    }

    /// Arguments for `rule`, looked up by short name then full name,
    /// case-insensitively.
    pub fn rule_args(&self, rule: &RuleInfo) -> Option<&toml::Table> {
        self.rules
            .iter()
            .find(|(key, _)| rule.matches_name(key))
            .map(|(_, table)| table)
    }

    /// False only when the rule's arguments say `enable = false`.
    pub fn rule_enabled(&self, rule: &RuleInfo) -> bool {
        self.rule_args(rule)
            .and_then(|t| t.get("enable"))
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }

    /// Compile include/exclude globs.
    pub fn compile_patterns(&self) -> Result<RuleSelector, ConfigError> {
        let compile = |patterns: &[String]| -> Result<Vec<Pattern>, ConfigError> {
            patterns
                .iter()
                .map(|p| {
                    Pattern::new(p).map_err(|e| ConfigError::InvalidPattern {
                        pattern: p.clone(),
                        message: e.msg.to_string(),
                    })
                })
                .collect()
        };
        Ok(RuleSelector {
            include: compile(&self.include_rules)?,
            exclude: compile(&self.exclude_rules)?,
        })
    }
}
