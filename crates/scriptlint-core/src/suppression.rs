//! Suppression directive records produced by the pragma parser.

use serde::{Deserialize, Serialize};

/// One suppression directive instance: a closed, inclusive line range for one
/// rule name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleSuppression {
    /// Rule name exactly as written in the directive.
    pub rule_name: String,
    pub start_line: u32,
    pub end_line: u32,
    pub justification: Option<String>,
    pub suppression_id: Option<String>,
}

impl RuleSuppression {
    pub fn new(rule_name: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            rule_name: rule_name.into(),
            start_line,
            end_line,
            justification: None,
            suppression_id: None,
        }
    }

    /// True when `line` lies inside `start_line..=end_line`.
    pub fn covers_line(&self, line: u32) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// A suppression with an id only applies to diagnostics carrying the same
    /// id; one without an id applies to every diagnostic of the rule.
    pub fn covers_id(&self, diagnostic_id: Option<&str>) -> bool {
        match self.suppression_id.as_deref() {
            None => true,
            Some(id) => diagnostic_id.is_some_and(|d| d.eq_ignore_ascii_case(id)),
        }
    }
}
