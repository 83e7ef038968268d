//! Per-script analysis: parse, run rules, apply suppressions, filter.
//!
//! Phase 1: parse into an immutable snapshot
//! Phase 2: rule execution (sequential or parallel)
//! Phase 3: pragma scan and suppression
//! Phase 4: severity filter, parse issues, ordering

pub mod builder;
pub mod fix;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use rayon::ThreadPool;
use scriptlint_core::config::ScriptLintConfig;
use scriptlint_core::diagnostics::{ScriptDiagnostic, SuppressedDiagnostic};
use scriptlint_core::errors::{AnalysisError, AnalysisResult};
use scriptlint_core::rules::RuleInfo;
use serde::Serialize;

use crate::engine::{
    create_executor, ExecutionPolicy, ParallelRuleExecutor, RuleExecutionError, RuleExecutor,
};
use crate::parser::{ParseIssue, ParsedScript, ScriptParser};
use crate::rules::{RuleContext, ScriptRule};
use crate::suppression::{CommentPragmaParser, SuppressionApplier};

pub use builder::ScriptAnalyzerBuilder;
pub use fix::FixOutput;

/// Everything one analysis produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisOutput {
    /// Reported diagnostics, parse errors included, ordered by position.
    pub diagnostics: Vec<ScriptDiagnostic>,
    pub suppressed: Vec<SuppressedDiagnostic>,
    #[serde(skip)]
    pub errors: Vec<RuleExecutionError>,
    pub parse_issues: Vec<ParseIssue>,
    pub analysis_time_us: u64,
}

impl AnalysisOutput {
    pub fn has_rule_failures(&self) -> bool {
        !self.errors.is_empty()
    }

    /// JSON report of diagnostics, suppressed findings, and parse issues.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A configured rule set ready to analyze scripts. Cheap to share; every
/// call builds its own executor.
pub struct ScriptAnalyzer {
    config: ScriptLintConfig,
    parser: Arc<dyn ScriptParser>,
    rules: Vec<Arc<dyn ScriptRule>>,
    pragmas: CommentPragmaParser,
    pool: Option<Arc<ThreadPool>>,
}

impl ScriptAnalyzer {
    pub fn builder() -> ScriptAnalyzerBuilder {
        ScriptAnalyzerBuilder::new()
    }

    pub fn config(&self) -> &ScriptLintConfig {
        &self.config
    }

    pub fn rules(&self) -> impl Iterator<Item = &RuleInfo> {
        self.rules.iter().map(|r| r.info())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn policy(&self) -> ExecutionPolicy {
        if self.config.analyzer.effective_parallel() {
            ExecutionPolicy::Parallel {
                degree: self.config.analyzer.effective_threads(),
            }
        } else {
            ExecutionPolicy::Sequential
        }
    }

    /// Reported diagnostics for `text`.
    pub fn analyze_script(&self, text: &str, path: Option<&Path>) -> Vec<ScriptDiagnostic> {
        self.analyze_script_full(text, path).diagnostics
    }

    /// Read and analyze a file.
    pub fn analyze_path(&self, path: &Path) -> AnalysisResult<Vec<ScriptDiagnostic>> {
        let text = std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.analyze_script(&text, Some(path)))
    }

    /// Diagnostics plus suppressed findings, rule failures, and parse issues.
    pub fn analyze_script_full(&self, text: &str, path: Option<&Path>) -> AnalysisOutput {
        let start = Instant::now();
        let script = self.parser.parse(text);
        let mut output = self.analyze_parsed(&script, path);
        output.analysis_time_us = start.elapsed().as_micros() as u64;
        output
    }

    pub(crate) fn analyze_parsed(&self, script: &ParsedScript, path: Option<&Path>) -> AnalysisOutput {
        let (found, errors) = self.run_rules(script, path);

        let table = self.pragmas.parse(script.tokens());
        let outcome = SuppressionApplier::apply(found, &table);

        let analyzer = &self.config.analyzer;
        let mut diagnostics: Vec<ScriptDiagnostic> = outcome
            .kept
            .into_iter()
            .filter(|d| analyzer.reports(d.severity))
            .collect();
        diagnostics.extend(script.issues().iter().map(|issue| {
            ScriptDiagnostic::parse_error(issue.message.clone(), issue.extent.clone())
                .with_script_path(path.map(Path::to_path_buf))
        }));
        diagnostics.sort_by(|a, b| {
            a.extent
                .start_offset
                .cmp(&b.extent.start_offset)
                .then_with(|| a.rule_name.cmp(&b.rule_name))
        });

        tracing::debug!(
            path = ?path,
            reported = diagnostics.len(),
            suppressed = outcome.suppressed.len(),
            failed_rules = errors.len(),
            parse_issues = script.issues().len(),
            "analysis finished"
        );
        AnalysisOutput {
            diagnostics,
            suppressed: outcome.suppressed,
            errors,
            parse_issues: script.issues().to_vec(),
            analysis_time_us: 0,
        }
    }

    fn run_rules(
        &self,
        script: &ParsedScript,
        path: Option<&Path>,
    ) -> (Vec<ScriptDiagnostic>, Vec<RuleExecutionError>) {
        let ctx = RuleContext::new(script, path);
        let mut executor: Box<dyn RuleExecutor + '_> = match (&self.pool, self.policy()) {
            (Some(pool), ExecutionPolicy::Parallel { .. }) => {
                Box::new(ParallelRuleExecutor::with_pool(ctx, Arc::clone(pool)))
            }
            (_, policy) => create_executor(policy, ctx),
        };
        for rule in &self.rules {
            executor.add_rule(Arc::clone(rule));
        }
        let diagnostics = executor.collect_diagnostics();
        (diagnostics, executor.errors().to_vec())
    }
}
