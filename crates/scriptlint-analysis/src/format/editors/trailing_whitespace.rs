//! Trailing whitespace removal.

use std::path::Path;

use scriptlint_core::config::FormatterConfig;
use scriptlint_core::edits::ScriptEdit;

use crate::format::editor::ScriptEditor;
use crate::parser::{ParsedScript, TokenKind};

/// Deletes spaces and tabs before each line end, unless the line end lies
/// inside a string literal or block comment.
#[derive(Debug, Clone)]
pub struct AvoidTrailingWhitespace {
    enabled: bool,
}

impl AvoidTrailingWhitespace {
    pub const NAME: &'static str = "AvoidTrailingWhitespace";

    pub fn new(config: &FormatterConfig) -> Self {
        Self {
            enabled: config.trim_trailing_whitespace,
        }
    }
}

impl ScriptEditor for AvoidTrailingWhitespace {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn edits(&self, script: &ParsedScript, _path: Option<&Path>) -> Vec<ScriptEdit> {
        if !self.enabled {
            return Vec::new();
        }
        let text = script.text();
        let index = script.line_index();
        let mut edits = Vec::new();
        for line in 1..=index.line_count() {
            let Some(range) = index.line_range(line) else {
                continue;
            };
            let content = text[range.clone()].trim_end_matches('\r');
            let trimmed = content.trim_end_matches([' ', '\t']);
            // A backtick escapes the whitespace after it.
            if trimmed.len() == content.len() || trimmed.ends_with('`') {
                continue;
            }
            let ws_start = range.start + trimmed.len();
            let ws_end = range.start + content.len();
            let protected = script.token_at(ws_start).is_some_and(|t| {
                matches!(t.kind, TokenKind::StringLiteral | TokenKind::BlockComment)
            });
            if !protected {
                edits.push(ScriptEdit::delete(ws_start, ws_end));
            }
        }
        edits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn edits(src: &str) -> Vec<ScriptEdit> {
        AvoidTrailingWhitespace::new(&FormatterConfig::default()).edits(&parse(src), None)
    }

    #[test]
    fn test_trailing_runs_deleted() {
        assert_eq!(
            edits("foo  \r\nbar\t\n  \n# note \n"),
            vec![
                ScriptEdit::delete(3, 5),
                ScriptEdit::delete(10, 11),
                ScriptEdit::delete(12, 14),
                ScriptEdit::delete(21, 22),
            ]
        );
    }

    #[test]
    fn test_strings_and_block_comments_kept() {
        assert!(edits("$a = 'x  \ny'\n<# a  \n#>\n").is_empty());
        assert!(edits("foo ` \nbar\n").is_empty());
    }

    #[test]
    fn test_disabled() {
        let config = FormatterConfig {
            trim_trailing_whitespace: false,
            ..Default::default()
        };
        assert!(AvoidTrailingWhitespace::new(&config).edits(&parse("a  \n"), None).is_empty());
    }
}
