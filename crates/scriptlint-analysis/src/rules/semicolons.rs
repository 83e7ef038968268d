//! Flags a `;` that only terminates a line.

use std::sync::Arc;

use scriptlint_core::diagnostics::{Correction, DiagnosticSeverity, ScriptDiagnostic};
use scriptlint_core::errors::{ConfigError, RuleError};
use scriptlint_core::rules::RuleInfo;

use super::registry::RuleServices;
use super::traits::{RuleContext, ScriptRule};
use crate::parser::TokenKind;

#[derive(Debug, Default)]
pub struct AvoidSemicolonsAsLineTerminators;

impl AvoidSemicolonsAsLineTerminators {
    pub const INFO: RuleInfo = RuleInfo::builtin(
        "AvoidSemicolonsAsLineTerminators",
        DiagnosticSeverity::Warning,
    )
    .with_description("Line endings do not need a terminating semicolon.");

    pub(crate) fn build(
        _services: &RuleServices,
        _args: Option<&toml::Table>,
    ) -> Result<Arc<dyn ScriptRule>, ConfigError> {
        Ok(Arc::new(Self))
    }
}

impl ScriptRule for AvoidSemicolonsAsLineTerminators {
    fn info(&self) -> &RuleInfo {
        &Self::INFO
    }

    fn analyze(&self, ctx: &RuleContext<'_>) -> Result<Vec<ScriptDiagnostic>, RuleError> {
        let tokens = ctx.script.tokens();
        // Open braces; `true` for a hashtable literal, where `;` separates entries.
        let mut braces: Vec<bool> = Vec::new();
        let mut diagnostics = Vec::new();
        for (idx, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::LBrace => braces.push(false),
                TokenKind::AtLBrace => braces.push(true),
                TokenKind::RBrace => {
                    braces.pop();
                }
                TokenKind::Semicolon if braces.last() != Some(&true) => {
                    let ends_line = tokens[idx + 1..]
                        .iter()
                        .find(|t| !t.kind.is_comment())
                        .map_or(true, |t| {
                            matches!(t.kind, TokenKind::NewLine | TokenKind::EndOfInput)
                        });
                    if ends_line {
                        diagnostics.push(
                            ctx.diagnostic(
                                &Self::INFO,
                                "Line ends with an unnecessary semicolon.",
                                token.extent.clone(),
                            )
                            .with_correction(
                                Correction::new(token.extent.clone(), "")
                                    .with_description("Remove the semicolon"),
                            ),
                        );
                    }
                }
                _ => {}
            }
        }
        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_terminating_semicolons_only() {
        let script = parse("a; b;\nc; # done\n$h = @{ x = 1;\n y = 2 }\n");
        let found = AvoidSemicolonsAsLineTerminators
            .analyze(&RuleContext::new(&script, None))
            .unwrap();
        let lines: Vec<u32> = found.iter().map(|d| d.extent.start_line).collect();
        assert_eq!(lines, vec![1, 2]);
        assert_eq!(found[0].extent.start_offset, 4);
    }
}
