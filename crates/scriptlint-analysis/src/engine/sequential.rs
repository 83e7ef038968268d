//! Sequential policy: every rule in registration order on the calling thread.

use std::sync::Arc;

use scriptlint_core::diagnostics::ScriptDiagnostic;

use crate::rules::{RuleContext, ScriptRule};

use super::executor::{run_guarded, RuleExecutionError, RuleExecutor};

pub struct SequentialRuleExecutor<'a> {
    ctx: RuleContext<'a>,
    rules: Vec<Arc<dyn ScriptRule>>,
    collected: Option<Vec<ScriptDiagnostic>>,
    errors: Vec<RuleExecutionError>,
}

impl<'a> SequentialRuleExecutor<'a> {
    pub fn new(ctx: RuleContext<'a>) -> Self {
        Self {
            ctx,
            rules: Vec::new(),
            collected: None,
            errors: Vec::new(),
        }
    }

    /// Number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl RuleExecutor for SequentialRuleExecutor<'_> {
    fn add_rule(&mut self, rule: Arc<dyn ScriptRule>) {
        self.rules.push(rule);
    }

    fn collect_diagnostics(&mut self) -> Vec<ScriptDiagnostic> {
        if let Some(collected) = &self.collected {
            return collected.clone();
        }
        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            match run_guarded(rule.as_ref(), &self.ctx) {
                Ok(found) => diagnostics.extend(found),
                Err(e) => self.errors.push(e),
            }
        }
        tracing::debug!(
            rules = self.rules.len(),
            diagnostics = diagnostics.len(),
            failed = self.errors.len(),
            "sequential execution finished"
        );
        self.collected = Some(diagnostics.clone());
        diagnostics
    }

    fn errors(&self) -> &[RuleExecutionError] {
        &self.errors
    }
}
