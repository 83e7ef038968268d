//! Parallel policy: threadsafe rules fan out over a bounded rayon pool, then
//! the remaining rules run one after another on the calling thread.

use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use scriptlint_core::diagnostics::ScriptDiagnostic;

use crate::rules::{RuleContext, ScriptRule};

use super::executor::{resolve_degree, run_guarded, RuleExecutionError, RuleExecutor};

pub struct ParallelRuleExecutor<'a> {
    ctx: RuleContext<'a>,
    threadsafe: Vec<Arc<dyn ScriptRule>>,
    single_writer: Vec<Arc<dyn ScriptRule>>,
    pool: Option<Arc<ThreadPool>>,
    collected: Option<Vec<ScriptDiagnostic>>,
    errors: Vec<RuleExecutionError>,
}

/// Build a worker pool of `degree` threads (0 = hardware parallelism).
pub fn build_rule_pool(degree: usize) -> Result<ThreadPool, rayon::ThreadPoolBuildError> {
    ThreadPoolBuilder::new()
        .num_threads(resolve_degree(degree))
        .thread_name(|i| format!("scriptlint-rule-{i}"))
        .build()
}

impl<'a> ParallelRuleExecutor<'a> {
    /// Executor with its own pool of `degree` workers.
    pub fn new(ctx: RuleContext<'a>, degree: usize) -> Self {
        let pool = match build_rule_pool(degree) {
            Ok(pool) => Some(Arc::new(pool)),
            Err(e) => {
                tracing::warn!(error = %e, "rule pool unavailable, running rules inline");
                None
            }
        };
        Self::with_parts(ctx, pool)
    }

    /// Executor sharing an existing pool.
    pub fn with_pool(ctx: RuleContext<'a>, pool: Arc<ThreadPool>) -> Self {
        Self::with_parts(ctx, Some(pool))
    }

    fn with_parts(ctx: RuleContext<'a>, pool: Option<Arc<ThreadPool>>) -> Self {
        Self {
            ctx,
            threadsafe: Vec::new(),
            single_writer: Vec::new(),
            pool,
            collected: None,
            errors: Vec::new(),
        }
    }

    /// (threadsafe, non-threadsafe) rule counts.
    pub fn partition_sizes(&self) -> (usize, usize) {
        (self.threadsafe.len(), self.single_writer.len())
    }
}

impl RuleExecutor for ParallelRuleExecutor<'_> {
    fn add_rule(&mut self, rule: Arc<dyn ScriptRule>) {
        if rule.info().threadsafe {
            self.threadsafe.push(rule);
        } else {
            self.single_writer.push(rule);
        }
    }

    fn collect_diagnostics(&mut self) -> Vec<ScriptDiagnostic> {
        if let Some(collected) = &self.collected {
            return collected.clone();
        }

        let ctx = self.ctx;
        let run_all = |rules: &[Arc<dyn ScriptRule>]| -> Vec<_> {
            rules
                .par_iter()
                .map(|rule| run_guarded(rule.as_ref(), &ctx))
                .collect()
        };
        let fanned_out: Vec<Result<Vec<ScriptDiagnostic>, RuleExecutionError>> = match &self.pool {
            Some(pool) => pool.install(|| run_all(&self.threadsafe)),
            None => self
                .threadsafe
                .iter()
                .map(|rule| run_guarded(rule.as_ref(), &ctx))
                .collect(),
        };

        // Joined: now the single-writer rules, strictly one at a time.
        let sequential = self
            .single_writer
            .iter()
            .map(|rule| run_guarded(rule.as_ref(), &ctx));

        let mut diagnostics = Vec::new();
        for outcome in fanned_out.into_iter().chain(sequential) {
            match outcome {
                Ok(found) => diagnostics.extend(found),
                Err(e) => self.errors.push(e),
            }
        }
        tracing::debug!(
            parallel = self.threadsafe.len(),
            sequential = self.single_writer.len(),
            diagnostics = diagnostics.len(),
            failed = self.errors.len(),
            "parallel execution finished"
        );
        self.collected = Some(diagnostics.clone());
        diagnostics
    }

    fn errors(&self) -> &[RuleExecutionError] {
        &self.errors
    }
}
