//! Built-in editors.

mod indentation;
mod open_brace;
mod trailing_whitespace;

pub use indentation::UseConsistentIndentation;
pub use open_brace::PlaceOpenBrace;
pub use trailing_whitespace::AvoidTrailingWhitespace;

use crate::parser::{Token, TokenKind};

/// Index of the nearest token before `idx` that is not a newline or line
/// continuation, and whether a newline was crossed on the way.
pub(crate) fn previous_on_line_or_above(tokens: &[Token], idx: usize) -> Option<(usize, bool)> {
    let mut crossed = false;
    for i in (0..idx).rev() {
        match tokens[i].kind {
            TokenKind::NewLine | TokenKind::LineContinuation => crossed = true,
            _ => return Some((i, crossed)),
        }
    }
    None
}

/// Leading whitespace of the line containing `offset`.
pub(crate) fn line_indent(text: &str, line_start: usize) -> &str {
    let rest = &text[line_start..];
    let end = rest
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(rest.len());
    &rest[..end]
}
