//! Opening brace placement.

use std::path::Path;

use scriptlint_core::config::FormatterConfig;
use scriptlint_core::edits::ScriptEdit;

use super::{line_indent, previous_on_line_or_above};
use crate::format::editor::ScriptEditor;
use crate::parser::{ParsedScript, Token, TokenKind};

/// Keywords whose body brace may sit on the keyword's own line.
const BODY_KEYWORDS: &[&str] = &[
    "begin", "catch", "do", "dynamicparam", "else", "end", "finally", "process", "try",
];

/// Keywords whose parenthesised header is followed by a body brace.
const HEADER_KEYWORDS: &[&str] = &["catch", "elseif", "for", "foreach", "if", "switch", "while", "until"];

/// Moves a body `{` onto the line of its header, or onto its own line when
/// `open_brace_on_same_line` is off.
#[derive(Debug, Clone)]
pub struct PlaceOpenBrace {
    on_same_line: bool,
}

impl PlaceOpenBrace {
    pub const NAME: &'static str = "PlaceOpenBrace";

    pub fn new(config: &FormatterConfig) -> Self {
        Self {
            on_same_line: config.open_brace_on_same_line,
        }
    }
}

impl ScriptEditor for PlaceOpenBrace {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn edits(&self, script: &ParsedScript, _path: Option<&Path>) -> Vec<ScriptEdit> {
        let tokens = script.tokens();
        let mut edits = Vec::new();
        for (idx, brace) in tokens.iter().enumerate() {
            if brace.kind != TokenKind::LBrace {
                continue;
            }
            let Some((prev_idx, crossed_newline)) = previous_on_line_or_above(tokens, idx) else {
                continue;
            };
            if !introduces_body(tokens, prev_idx) {
                continue;
            }
            let prev = &tokens[prev_idx];
            match (self.on_same_line, crossed_newline) {
                (true, true) => edits.push(ScriptEdit::replace(prev.end(), brace.start(), " ")),
                (false, false) => {
                    let line_start = script
                        .line_index()
                        .line_start(prev.extent.start_line)
                        .unwrap_or(0);
                    let indent = line_indent(script.text(), line_start);
                    edits.push(ScriptEdit::replace(
                        prev.end(),
                        brace.start(),
                        format!("\n{indent}"),
                    ));
                }
                _ => {}
            }
        }
        edits
    }
}

/// True when the token at `idx` ends a construct header whose next `{` is
/// its body: `else`, `try`, `function Name`, `if (…)` and similar.
fn introduces_body(tokens: &[Token], idx: usize) -> bool {
    let token = &tokens[idx];
    match token.kind {
        TokenKind::Keyword => BODY_KEYWORDS.iter().any(|k| token.is_keyword(k)),
        TokenKind::Generic => previous_significant(tokens, idx)
            .is_some_and(|p| tokens[p].is_keyword("function") || tokens[p].is_keyword("filter")),
        TokenKind::RParen => matching_open_paren(tokens, idx)
            .and_then(|open| previous_significant(tokens, open))
            .is_some_and(|p| HEADER_KEYWORDS.iter().any(|k| tokens[p].is_keyword(k))),
        // `catch [SomeException]`
        TokenKind::RBracket => {
            let mut i = idx;
            while i > 0 && tokens[i].kind != TokenKind::LBracket {
                i -= 1;
            }
            previous_significant(tokens, i).is_some_and(|p| tokens[p].is_keyword("catch"))
        }
        _ => false,
    }
}

fn previous_significant(tokens: &[Token], idx: usize) -> Option<usize> {
    (0..idx).rev().find(|&i| !tokens[i].kind.is_trivia())
}

fn matching_open_paren(tokens: &[Token], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..=close).rev() {
        match tokens[i].kind {
            TokenKind::RParen => depth += 1,
            k if k.opens_paren() => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
