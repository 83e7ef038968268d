//! Executor contract, failure records, and the guarded single-rule runner
//! shared by both policies.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use scriptlint_core::diagnostics::ScriptDiagnostic;
use scriptlint_core::errors::RuleError;

use crate::rules::{RuleContext, ScriptRule};

use super::parallel::ParallelRuleExecutor;
use super::sequential::SequentialRuleExecutor;

/// Why a rule produced no diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleFailure {
    #[error("{0}")]
    Error(#[from] RuleError),

    #[error("panicked: {0}")]
    Panic(String),
}

/// A captured rule failure. Never propagated to the analyzer's caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rule {rule_name} failed: {failure}")]
pub struct RuleExecutionError {
    pub rule_name: String,
    pub failure: RuleFailure,
}

/// Runs a set of rules against one fixed parsed script.
pub trait RuleExecutor {
    /// Register a rule. Rules added after `collect_diagnostics` are not run.
    fn add_rule(&mut self, rule: Arc<dyn ScriptRule>);

    /// Run every registered rule exactly once and return the union of their
    /// diagnostics. Later calls return the same diagnostics without re-running.
    fn collect_diagnostics(&mut self) -> Vec<ScriptDiagnostic>;

    /// Every rule that failed during `collect_diagnostics`.
    fn errors(&self) -> &[RuleExecutionError];
}

/// Concurrency policy for one analysis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPolicy {
    Sequential,
    /// `degree == 0` means available hardware parallelism.
    Parallel { degree: usize },
}

/// Build an executor for `ctx` under `policy`.
pub fn create_executor<'a>(
    policy: ExecutionPolicy,
    ctx: RuleContext<'a>,
) -> Box<dyn RuleExecutor + 'a> {
    match policy {
        ExecutionPolicy::Sequential => Box::new(SequentialRuleExecutor::new(ctx)),
        ExecutionPolicy::Parallel { degree } => Box::new(ParallelRuleExecutor::new(ctx, degree)),
    }
}

/// Resolve a configured degree of parallelism; 0 means one worker per
/// available hardware thread.
pub fn resolve_degree(degree: usize) -> usize {
    if degree > 0 {
        return degree;
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Run one rule, converting both `Err` and panics into a
/// [`RuleExecutionError`].
pub(crate) fn run_guarded(
    rule: &dyn ScriptRule,
    ctx: &RuleContext<'_>,
) -> Result<Vec<ScriptDiagnostic>, RuleExecutionError> {
    let outcome = catch_unwind(AssertUnwindSafe(|| rule.analyze(ctx)));
    let failure = match outcome {
        Ok(Ok(diagnostics)) => return Ok(diagnostics),
        Ok(Err(e)) => RuleFailure::Error(e),
        Err(payload) => RuleFailure::Panic(panic_message(payload.as_ref())),
    };
    let rule_name = rule.info().full_name();
    tracing::warn!(rule = %rule_name, error = %failure, "rule failed during analysis");
    Err(RuleExecutionError { rule_name, failure })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
