//! Reports functions defined more than once in the same scope.
//!
//! Keeps a scratch table between the tree walk and reporting, so the rule is
//! registered as not threadsafe and always runs alone.

use std::sync::{Arc, Mutex, PoisonError};

use scriptlint_core::diagnostics::{DiagnosticSeverity, ScriptDiagnostic};
use scriptlint_core::errors::{ConfigError, RuleError};
use scriptlint_core::rules::RuleInfo;
use scriptlint_core::types::collections::FxHashMap;

use super::registry::RuleServices;
use super::traits::{RuleContext, ScriptRule};
use crate::parser::{NodeId, NodeKind};

#[derive(Default)]
pub struct AvoidDuplicateFunctionDefinitions {
    /// (scope node, lower-cased name) → line of the first definition.
    seen: Mutex<FxHashMap<(Option<NodeId>, String), u32>>,
}

impl AvoidDuplicateFunctionDefinitions {
    pub const INFO: RuleInfo = RuleInfo::builtin(
        "AvoidDuplicateFunctionDefinitions",
        DiagnosticSeverity::Warning,
    )
    .with_description("Define each function name once per scope.")
    .not_threadsafe();

    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn build(
        _services: &RuleServices,
        _args: Option<&toml::Table>,
    ) -> Result<Arc<dyn ScriptRule>, ConfigError> {
        Ok(Arc::new(Self::new()))
    }
}

impl ScriptRule for AvoidDuplicateFunctionDefinitions {
    fn info(&self) -> &RuleInfo {
        &Self::INFO
    }

    fn analyze(&self, ctx: &RuleContext<'_>) -> Result<Vec<ScriptDiagnostic>, RuleError> {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        seen.clear();

        let tree = ctx.script.tree();
        let mut diagnostics = Vec::new();
        for id in tree.nodes_of_kind(NodeKind::FunctionDefinition) {
            let Some(name) = ctx.script.function_name(id) else {
                continue;
            };
            let scope = tree.node(id).and_then(|n| n.parent);
            let key = (scope, name.text().to_ascii_lowercase());
            match seen.get(&key) {
                Some(&first_line) => diagnostics.push(ctx.diagnostic(
                    &Self::INFO,
                    format!(
                        "Function '{}' is already defined on line {first_line}.",
                        name.text()
                    ),
                    name.extent.clone(),
                )),
                None => {
                    seen.insert(key, name.extent.start_line);
                }
            }
        }
        Ok(diagnostics)
    }
}
