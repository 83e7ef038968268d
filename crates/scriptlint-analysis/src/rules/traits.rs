//! The rule contract.

use std::path::Path;

use scriptlint_core::diagnostics::ScriptDiagnostic;
use scriptlint_core::errors::RuleError;
use scriptlint_core::rules::RuleInfo;
use scriptlint_core::types::extent::ScriptExtent;

use crate::parser::ParsedScript;

/// Read-only view of one parsed script handed to every rule.
///
/// Holds shared borrows only; rules have no way to mutate the tree or tokens.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub script: &'a ParsedScript,
    pub path: Option<&'a Path>,
}

impl<'a> RuleContext<'a> {
    pub fn new(script: &'a ParsedScript, path: Option<&'a Path>) -> Self {
        Self { script, path }
    }

    /// A diagnostic for `rule` at `extent`, tagged with the script path.
    pub fn diagnostic(
        &self,
        rule: &RuleInfo,
        message: impl Into<String>,
        extent: ScriptExtent,
    ) -> ScriptDiagnostic {
        ScriptDiagnostic::for_rule(rule, message, extent)
            .with_script_path(self.path.map(Path::to_path_buf))
    }
}

/// A runnable analysis over one parsed script.
///
/// One instance serves many analyses, possibly concurrently when
/// `info().threadsafe` is set; implementations hold no per-call state outside
/// of synchronized scratch space.
pub trait ScriptRule: Send + Sync {
    fn info(&self) -> &RuleInfo;

    fn analyze(&self, ctx: &RuleContext<'_>) -> Result<Vec<ScriptDiagnostic>, RuleError>;
}
