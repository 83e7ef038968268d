//! Partition diagnostics into kept and suppressed.

use scriptlint_core::diagnostics::{ScriptDiagnostic, SuppressedDiagnostic};
use scriptlint_core::suppression::RuleSuppression;

use super::pragma::SuppressionTable;

/// Result of applying a suppression table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionOutcome {
    pub kept: Vec<ScriptDiagnostic>,
    pub suppressed: Vec<SuppressedDiagnostic>,
}

/// Pure filter over diagnostics; never creates or edits a finding.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuppressionApplier;

impl SuppressionApplier {
    /// Split `diagnostics` by whether any suppression range for the
    /// diagnostic's rule (under any of its names) covers its start line.
    pub fn apply(diagnostics: Vec<ScriptDiagnostic>, table: &SuppressionTable) -> SuppressionOutcome {
        let mut outcome = SuppressionOutcome::default();
        if table.is_empty() {
            outcome.kept = diagnostics;
            return outcome;
        }
        for diagnostic in diagnostics {
            let matching = matching_suppressions(&diagnostic, table);
            if matching.is_empty() {
                outcome.kept.push(diagnostic);
            } else {
                outcome.suppressed.push(SuppressedDiagnostic {
                    diagnostic,
                    suppressions: matching,
                });
            }
        }
        outcome
    }

    /// Only the diagnostics that survive suppression.
    pub fn filter(diagnostics: Vec<ScriptDiagnostic>, table: &SuppressionTable) -> Vec<ScriptDiagnostic> {
        Self::apply(diagnostics, table).kept
    }
}

fn matching_suppressions(
    diagnostic: &ScriptDiagnostic,
    table: &SuppressionTable,
) -> Vec<RuleSuppression> {
    let line = diagnostic.line();
    let id = diagnostic.suppression_id.as_deref();
    let mut matching: Vec<RuleSuppression> = Vec::new();
    for name in diagnostic.rule_names() {
        for suppression in table.for_rule(&name) {
            if suppression.covers_line(line)
                && suppression.covers_id(id)
                && !matching.contains(suppression)
            {
                matching.push(suppression.clone());
            }
        }
    }
    matching
}
