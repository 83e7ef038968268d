//! Leading whitespace normalisation.

use std::path::Path;

use scriptlint_core::config::FormatterConfig;
use scriptlint_core::edits::ScriptEdit;

use crate::format::editor::ScriptEditor;
use crate::parser::{ParsedScript, TokenKind};

/// Sets each line's indentation to one unit per enclosing brace, plus one
/// for a line continuing a pipeline or a backtick continuation.
///
/// Blank lines and lines that start inside a multi-line string or comment
/// are left alone.
#[derive(Debug, Clone)]
pub struct UseConsistentIndentation {
    unit: String,
}

impl UseConsistentIndentation {
    pub const NAME: &'static str = "UseConsistentIndentation";

    pub fn new(config: &FormatterConfig) -> Self {
        Self {
            unit: config.indent_unit(),
        }
    }
}

impl ScriptEditor for UseConsistentIndentation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn edits(&self, script: &ParsedScript, _path: Option<&Path>) -> Vec<ScriptEdit> {
        let text = script.text();
        let index = script.line_index();
        let mut edits = Vec::new();

        let mut depth = 0usize;
        let mut last_code = TokenKind::NewLine;
        let mut continuation = false;
        let mut at_line_start = true;

        for token in script.tokens() {
            let starts_line = at_line_start;
            at_line_start = matches!(token.kind, TokenKind::NewLine | TokenKind::LineContinuation);

            if starts_line && !matches!(token.kind, TokenKind::NewLine | TokenKind::EndOfInput) {
                let line_start = index.line_start(token.extent.start_line).unwrap_or(0);
                let leading = &text[line_start..token.start()];
                if leading.bytes().all(|b| b == b' ' || b == b'\t') {
                    let mut level = depth;
                    if token.kind == TokenKind::RBrace {
                        level = level.saturating_sub(1);
                    }
                    if continuation {
                        level += 1;
                    }
                    let desired = self.unit.repeat(level);
                    if leading != desired {
                        edits.push(ScriptEdit::replace(line_start, token.start(), desired));
                    }
                }
            }

            match token.kind {
                TokenKind::LBrace | TokenKind::AtLBrace => depth += 1,
                TokenKind::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            match token.kind {
                TokenKind::NewLine => continuation = last_code == TokenKind::Pipe,
                TokenKind::LineContinuation => continuation = true,
                k if k.is_comment() => {}
                k => last_code = k,
            }
        }
        edits
    }
}
