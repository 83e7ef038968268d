//! Rules that expose a formatting editor as diagnostics.
//!
//! Each edit becomes one diagnostic carrying a single correction. The
//! diagnostic may flag a wider region than the edit replaces, e.g. the whole
//! line for an indentation fix.

use std::sync::Arc;

use scriptlint_core::config::FormatterConfig;
use scriptlint_core::diagnostics::{Correction, DiagnosticSeverity, ScriptDiagnostic};
use scriptlint_core::edits::ScriptEdit;
use scriptlint_core::errors::{ConfigError, RuleError};
use scriptlint_core::rules::RuleInfo;
use scriptlint_core::types::extent::ScriptExtent;

use super::registry::{arg, RuleServices};
use super::traits::{RuleContext, ScriptRule};
use crate::format::editors::{AvoidTrailingWhitespace, PlaceOpenBrace, UseConsistentIndentation};
use crate::format::ScriptEditor;
use crate::parser::{ParsedScript, TokenKind};

/// Region a diagnostic reports for an edit.
pub type FlagExtent = fn(&ParsedScript, &ScriptEdit) -> ScriptExtent;

pub struct FormattingRule {
    info: &'static RuleInfo,
    editor: Box<dyn ScriptEditor>,
    message: &'static str,
    flag: FlagExtent,
}

impl FormattingRule {
    pub const PLACE_OPEN_BRACE: RuleInfo =
        RuleInfo::builtin("PlaceOpenBrace", DiagnosticSeverity::Warning)
            .with_description("Place open braces consistently.");

    pub const USE_CONSISTENT_INDENTATION: RuleInfo =
        RuleInfo::builtin("UseConsistentIndentation", DiagnosticSeverity::Warning)
            .with_description("Indent each line by its nesting depth.");

    pub const AVOID_TRAILING_WHITESPACE: RuleInfo =
        RuleInfo::builtin("AvoidTrailingWhitespace", DiagnosticSeverity::Information)
            .with_description("Lines should not end with whitespace.");

    pub fn new(
        info: &'static RuleInfo,
        editor: Box<dyn ScriptEditor>,
        message: &'static str,
        flag: FlagExtent,
    ) -> Self {
        Self {
            info,
            editor,
            message,
            flag,
        }
    }

    pub fn editor_name(&self) -> &'static str {
        self.editor.name()
    }

    pub(crate) fn build_place_open_brace(
        services: &RuleServices,
        args: Option<&toml::Table>,
    ) -> Result<Arc<dyn ScriptRule>, ConfigError> {
        let config = editor_config(&services.formatter, &Self::PLACE_OPEN_BRACE, args)?;
        Ok(Arc::new(Self::new(
            &Self::PLACE_OPEN_BRACE,
            Box::new(PlaceOpenBrace::new(&config)),
            "Open brace is not placed consistently.",
            flag_brace,
        )))
    }

    pub(crate) fn build_use_consistent_indentation(
        services: &RuleServices,
        args: Option<&toml::Table>,
    ) -> Result<Arc<dyn ScriptRule>, ConfigError> {
        let config = editor_config(&services.formatter, &Self::USE_CONSISTENT_INDENTATION, args)?;
        Ok(Arc::new(Self::new(
            &Self::USE_CONSISTENT_INDENTATION,
            Box::new(UseConsistentIndentation::new(&config)),
            "Indentation is not consistent.",
            flag_line,
        )))
    }

    pub(crate) fn build_avoid_trailing_whitespace(
        services: &RuleServices,
        args: Option<&toml::Table>,
    ) -> Result<Arc<dyn ScriptRule>, ConfigError> {
        // The rule reports regardless of the formatter's trim switch.
        let mut config = editor_config(&services.formatter, &Self::AVOID_TRAILING_WHITESPACE, args)?;
        config.trim_trailing_whitespace = true;
        Ok(Arc::new(Self::new(
            &Self::AVOID_TRAILING_WHITESPACE,
            Box::new(AvoidTrailingWhitespace::new(&config)),
            "Line has trailing whitespace.",
            flag_edit,
        )))
    }
}

impl ScriptRule for FormattingRule {
    fn info(&self) -> &RuleInfo {
        self.info
    }

    fn analyze(&self, ctx: &RuleContext<'_>) -> Result<Vec<ScriptDiagnostic>, RuleError> {
        let script = ctx.script;
        let diagnostics = self
            .editor
            .edits(script, ctx.path)
            .into_iter()
            .map(|edit| {
                let correction = Correction::new(
                    script.extent(edit.start, edit.end),
                    edit.replacement.clone(),
                )
                .with_description(self.info.description);
                ctx.diagnostic(self.info, self.message, (self.flag)(script, &edit))
                    .with_correction(correction)
            })
            .collect();
        Ok(diagnostics)
    }
}

/// Formatter settings with per-rule overrides applied.
fn editor_config(
    base: &FormatterConfig,
    rule: &RuleInfo,
    args: Option<&toml::Table>,
) -> Result<FormatterConfig, ConfigError> {
    let mut config = base.clone();
    if let Some(size) = arg(args, rule, "indent_size", toml::Value::as_integer)? {
        config.indent_size = usize::try_from(size).map_err(|_| ConfigError::InvalidValue {
            field: format!("analyzer.rules.{}.indent_size", rule.name),
            message: format!("{size} is negative"),
        })?;
    }
    if let Some(tabs) = arg(args, rule, "use_tabs", toml::Value::as_bool)? {
        config.use_tabs = tabs;
    }
    if let Some(same_line) = arg(args, rule, "on_same_line", toml::Value::as_bool)? {
        config.open_brace_on_same_line = same_line;
    }
    config.validate()?;
    Ok(config)
}

fn flag_edit(script: &ParsedScript, edit: &ScriptEdit) -> ScriptExtent {
    script.extent(edit.start, edit.end)
}

/// The `{` the edit moves.
fn flag_brace(script: &ParsedScript, edit: &ScriptEdit) -> ScriptExtent {
    match script.token_at(edit.end) {
        Some(token) if token.kind == TokenKind::LBrace => token.extent.clone(),
        _ => flag_edit(script, edit),
    }
}

/// The line whose indentation the edit rewrites, without its terminator.
fn flag_line(script: &ParsedScript, edit: &ScriptEdit) -> ScriptExtent {
    let index = script.line_index();
    let (line, _) = index.line_column(edit.start);
    match index.line_range(line) {
        Some(range) => {
            let text = &script.text()[range.clone()];
            script.extent(range.start, range.start + text.trim_end_matches('\r').len())
        }
        None => flag_edit(script, edit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::InMemoryCommandStore;
    use crate::parser::parse;

    fn services() -> RuleServices {
        RuleServices {
            commands: Arc::new(InMemoryCommandStore::new()),
            formatter: FormatterConfig::default(),
        }
    }

    #[test]
    fn test_indentation_flags_whole_line() {
        let rule = FormattingRule::build_use_consistent_indentation(&services(), None).unwrap();
        let script = parse("if ($x) {\nfoo bar\n}\n");
        let found = rule.analyze(&RuleContext::new(&script, None)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].extent.text, "foo bar");
        let fix = &found[0].corrections[0];
        assert_eq!((fix.extent.start_offset, fix.extent.end_offset), (10, 10));
        assert_eq!(fix.replacement, "    ");
    }

    #[test]
    fn test_brace_flags_brace_token() {
        let rule = FormattingRule::build_place_open_brace(&services(), None).unwrap();
        let script = parse("if ($x)\n{\n}\n");
        let found = rule.analyze(&RuleContext::new(&script, None)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].extent.text, "{");
        assert_eq!(found[0].corrections[0].extent.text, "\n");
    }

    #[test]
    fn test_rule_arguments_override_formatter() {
        let args: toml::Table = toml::from_str("indent_size = 2").unwrap();
        let rule =
            FormattingRule::build_use_consistent_indentation(&services(), Some(&args)).unwrap();
        let script = parse("{\n    a\n}\n");
        let found = rule.analyze(&RuleContext::new(&script, None)).unwrap();
        assert_eq!(found[0].corrections[0].replacement, "  ");

        let bad: toml::Table = toml::from_str("indent_size = 'wide'").unwrap();
        assert!(matches!(
            FormattingRule::build_use_consistent_indentation(&services(), Some(&bad)),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
