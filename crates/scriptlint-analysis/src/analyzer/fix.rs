//! Fix mode: apply rule corrections until the script settles.

use std::path::Path;

use scriptlint_core::diagnostics::ScriptDiagnostic;
use scriptlint_core::edits::ScriptEdit;
use scriptlint_core::errors::AnalysisResult;
use serde::Serialize;

use super::ScriptAnalyzer;
use crate::edits::ScriptFormatBuffer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixOutput {
    pub text: String,
    /// Corrections applied across all passes.
    pub applied: usize,
    /// Passes that changed the text.
    pub passes: usize,
}

impl ScriptAnalyzer {
    /// Repeatedly analyze and apply corrections, at most
    /// `analyzer.max_fix_passes` times.
    ///
    /// Each pass applies a non-overlapping subset chosen greedily by start
    /// offset; the rest wait for the next pass. Corrections from rules that
    /// are not idempotent are applied on the first pass only.
    pub fn fix(&self, text: &str, path: Option<&Path>) -> AnalysisResult<FixOutput> {
        let max_passes = self.config.analyzer.effective_max_fix_passes();
        let mut buffer = ScriptFormatBuffer::new(self.parser.as_ref(), text, path);
        let mut applied = 0;
        let mut passes = 0;

        for pass in 0..max_passes {
            let output = self.analyze_parsed(buffer.script(), path);
            let batch = self.select_corrections(&output.diagnostics, pass == 0);
            if batch.is_empty() {
                break;
            }
            buffer.apply_edits(&batch)?;
            applied += batch.len();
            passes += 1;
            tracing::debug!(pass, corrections = batch.len(), "fix pass applied");
        }

        Ok(FixOutput {
            text: buffer.text().to_string(),
            applied,
            passes,
        })
    }

    fn select_corrections(&self, diagnostics: &[ScriptDiagnostic], first_pass: bool) -> Vec<ScriptEdit> {
        let mut candidates: Vec<ScriptEdit> = diagnostics
            .iter()
            .filter(|d| first_pass || self.is_idempotent(d))
            .flat_map(|d| d.corrections.iter().map(|c| c.to_edit()))
            .collect();
        candidates.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));

        let mut selected: Vec<ScriptEdit> = Vec::with_capacity(candidates.len());
        for edit in candidates {
            if selected.iter().any(|s| *s == edit || s.overlaps(&edit)) {
                continue;
            }
            selected.push(edit);
        }
        selected
    }

    fn is_idempotent(&self, diagnostic: &ScriptDiagnostic) -> bool {
        let Some(full) = diagnostic.rule_full_name() else {
            return true;
        };
        self.rules
            .iter()
            .find(|r| r.info().full_name().eq_ignore_ascii_case(&full))
            .map_or(true, |r| r.info().idempotent)
    }
}
