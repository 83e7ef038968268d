//! Diagnostics, corrections, and suppressed-diagnostic records.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::edits::ScriptEdit;
use crate::rules::RuleInfo;
use crate::suppression::RuleSuppression;
use crate::types::extent::ScriptExtent;

/// Diagnostic severities. Declaration order is the filtering order used by
/// calling surfaces (`Information < Warning < Error < ParseError`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum DiagnosticSeverity {
    Information,
    #[default]
    Warning,
    Error,
    ParseError,
}

impl DiagnosticSeverity {
    /// Severity name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Information => "Information",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::ParseError => "ParseError",
        }
    }

    /// Parse from string, case-insensitively.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "information" | "info" => Some(Self::Information),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "parseerror" => Some(Self::ParseError),
            _ => None,
        }
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A proposed text replacement attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub extent: ScriptExtent,
    pub replacement: String,
    pub description: Option<String>,
}

impl Correction {
    pub fn new(extent: ScriptExtent, replacement: impl Into<String>) -> Self {
        Self {
            extent,
            replacement: replacement.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The text edit this correction performs.
    pub fn to_edit(&self) -> ScriptEdit {
        ScriptEdit::replace(
            self.extent.start_offset,
            self.extent.end_offset,
            self.replacement.clone(),
        )
    }
}

/// Structured context some rules attach to their findings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiagnosticProperties {
    pub command: Option<String>,
    pub parameter: Option<String>,
    pub platform: Option<String>,
}

/// One reported finding.
///
/// `rule_name`/`rule_namespace` are `None` for diagnostics that do not come
/// from a rule (parse errors).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDiagnostic {
    pub rule_name: Option<String>,
    pub rule_namespace: Option<String>,
    pub message: String,
    pub extent: ScriptExtent,
    pub severity: DiagnosticSeverity,
    pub corrections: SmallVec<[Correction; 1]>,
    pub suppression_id: Option<String>,
    pub properties: Option<DiagnosticProperties>,
    pub script_path: Option<PathBuf>,
}

impl ScriptDiagnostic {
    /// Create a diagnostic attributed to `rule`, at the rule's default severity.
    pub fn for_rule(rule: &RuleInfo, message: impl Into<String>, extent: ScriptExtent) -> Self {
        Self {
            rule_name: Some(rule.name.to_string()),
            rule_namespace: Some(rule.namespace.to_string()),
            message: message.into(),
            extent,
            severity: rule.severity,
            corrections: SmallVec::new(),
            suppression_id: None,
            properties: None,
            script_path: None,
        }
    }

    /// Create a parse-error diagnostic (no rule attribution).
    pub fn parse_error(message: impl Into<String>, extent: ScriptExtent) -> Self {
        Self {
            rule_name: None,
            rule_namespace: None,
            message: message.into(),
            extent,
            severity: DiagnosticSeverity::ParseError,
            corrections: SmallVec::new(),
            suppression_id: None,
            properties: None,
            script_path: None,
        }
    }

    pub fn with_correction(mut self, correction: Correction) -> Self {
        self.corrections.push(correction);
        self
    }

    pub fn with_suppression_id(mut self, id: impl Into<String>) -> Self {
        self.suppression_id = Some(id.into());
        self
    }

    pub fn with_properties(mut self, properties: DiagnosticProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_script_path(mut self, path: Option<PathBuf>) -> Self {
        self.script_path = path;
        self
    }

    /// `namespace/name`, or `None` for diagnostics without a rule.
    pub fn rule_full_name(&self) -> Option<String> {
        match (&self.rule_namespace, &self.rule_name) {
            (Some(ns), Some(name)) => Some(format!("{ns}/{name}")),
            (None, Some(name)) => Some(name.clone()),
            _ => None,
        }
    }

    /// Every name the diagnostic's rule answers to: short, `namespace/name`,
    /// and `namespaceName`.
    pub fn rule_names(&self) -> Vec<String> {
        let Some(name) = &self.rule_name else {
            return Vec::new();
        };
        match &self.rule_namespace {
            Some(ns) => vec![name.clone(), format!("{ns}/{name}"), format!("{ns}{name}")],
            None => vec![name.clone()],
        }
    }

    /// Line the diagnostic starts on; suppression ranges are matched against it.
    pub fn line(&self) -> u32 {
        self.extent.start_line
    }
}

/// A diagnostic that matched a suppression directive, kept for callers that
/// track suppressed findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressedDiagnostic {
    pub diagnostic: ScriptDiagnostic,
    pub suppressions: Vec<RuleSuppression>,
}

impl SuppressedDiagnostic {
    /// Justification of the first matching suppression that carries one.
    pub fn justification(&self) -> Option<&str> {
        self.suppressions
            .iter()
            .find_map(|s| s.justification.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_total_order() {
        assert!(DiagnosticSeverity::Information < DiagnosticSeverity::Warning);
        assert!(DiagnosticSeverity::Warning < DiagnosticSeverity::Error);
        assert!(DiagnosticSeverity::Error < DiagnosticSeverity::ParseError);
    }

    #[test]
    fn test_severity_parse_roundtrip_names() {
        for sev in [
            DiagnosticSeverity::Information,
            DiagnosticSeverity::Warning,
            DiagnosticSeverity::Error,
            DiagnosticSeverity::ParseError,
        ] {
            assert_eq!(DiagnosticSeverity::parse_str(sev.name()), Some(sev));
        }
        assert_eq!(DiagnosticSeverity::parse_str("bogus"), None);
    }

    #[test]
    fn test_parse_error_has_no_rule() {
        let d = ScriptDiagnostic::parse_error("missing '}'", ScriptExtent::default());
        assert_eq!(d.severity, DiagnosticSeverity::ParseError);
        assert!(d.rule_full_name().is_none());
    }
}
