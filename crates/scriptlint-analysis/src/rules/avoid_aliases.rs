//! Flags command aliases and offers the full command name.

use std::sync::Arc;

use scriptlint_core::diagnostics::{Correction, DiagnosticProperties, DiagnosticSeverity, ScriptDiagnostic};
use scriptlint_core::errors::{ConfigError, RuleError};
use scriptlint_core::rules::RuleInfo;

use super::registry::{arg, RuleServices};
use super::traits::{RuleContext, ScriptRule};
use crate::metadata::CommandMetadataStore;

pub struct AvoidUsingCmdletAliases {
    commands: Arc<dyn CommandMetadataStore>,
    allowlist: Vec<String>,
}

impl AvoidUsingCmdletAliases {
    pub const INFO: RuleInfo =
        RuleInfo::builtin("AvoidUsingCmdletAliases", DiagnosticSeverity::Warning)
            .with_description("Use full command names instead of aliases.");

    pub fn new(commands: Arc<dyn CommandMetadataStore>) -> Self {
        Self {
            commands,
            allowlist: Vec::new(),
        }
    }

    /// Aliases that are never reported.
    pub fn with_allowlist(mut self, allowlist: Vec<String>) -> Self {
        self.allowlist = allowlist;
        self
    }

    pub(crate) fn build(
        services: &RuleServices,
        args: Option<&toml::Table>,
    ) -> Result<Arc<dyn ScriptRule>, ConfigError> {
        let allowlist = arg(args, &Self::INFO, "allowlist", |v| {
            v.as_array()?
                .iter()
                .map(|s| s.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })?
        .unwrap_or_default();
        Ok(Arc::new(
            Self::new(Arc::clone(&services.commands)).with_allowlist(allowlist),
        ))
    }
}

impl ScriptRule for AvoidUsingCmdletAliases {
    fn info(&self) -> &RuleInfo {
        &Self::INFO
    }

    fn analyze(&self, ctx: &RuleContext<'_>) -> Result<Vec<ScriptDiagnostic>, RuleError> {
        let mut diagnostics = Vec::new();
        for token in ctx.script.command_name_tokens() {
            let alias = token.text();
            if self.allowlist.iter().any(|a| a.eq_ignore_ascii_case(alias)) {
                continue;
            }
            let Some(target) = self.commands.alias_target(alias)? else {
                continue;
            };
            if target.eq_ignore_ascii_case(alias) {
                continue;
            }
            let correction = Correction::new(token.extent.clone(), target.clone())
                .with_description(format!("Replace {alias} with {target}"));
            diagnostics.push(
                ctx.diagnostic(
                    &Self::INFO,
                    format!("'{alias}' is an alias of '{target}'. Use the full command name."),
                    token.extent.clone(),
                )
                .with_correction(correction)
                .with_suppression_id(alias)
                .with_properties(DiagnosticProperties {
                    command: Some(target),
                    ..Default::default()
                }),
            );
        }
        Ok(diagnostics)
    }
}
