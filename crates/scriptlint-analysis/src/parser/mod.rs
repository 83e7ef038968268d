//! Script parser: text in, `(tree, tokens, issues)` out.
//!
//! The parser never fails. Malformed input yields a partial tree plus
//! [`ParseIssue`]s, and the token stream always covers the whole text.

pub mod lexer;
pub mod token;
pub mod tree;

use std::path::Path;
use std::sync::Arc;

use scriptlint_core::types::extent::{LineIndex, ScriptExtent};
use serde::Serialize;

pub use token::{Token, TokenKind};
pub use tree::{Node, NodeId, NodeKind, ScriptTree, MAX_NESTING};

/// A syntax problem found while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseIssue {
    pub message: String,
    pub extent: ScriptExtent,
}

/// An immutable parse snapshot. Text, tokens, and tree are built together and
/// never change independently.
#[derive(Debug, Clone)]
pub struct ParsedScript {
    text: Arc<str>,
    line_index: LineIndex,
    tokens: Vec<Token>,
    tree: ScriptTree,
    issues: Vec<ParseIssue>,
}

impl ParsedScript {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn tree(&self) -> &ScriptTree {
        &self.tree
    }

    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn has_errors(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Extent over `[start, end)` of this script's text.
    pub fn extent(&self, start: usize, end: usize) -> ScriptExtent {
        self.line_index.extent(&self.text, start, end)
    }

    /// Non-trivia tokens with their indices, excluding end of input.
    pub fn significant_tokens(&self) -> impl Iterator<Item = (usize, &Token)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia() && t.kind != TokenKind::EndOfInput)
    }

    /// The token whose extent strictly contains `offset` (start inclusive,
    /// end exclusive), if any.
    pub fn token_at(&self, offset: usize) -> Option<&Token> {
        let idx = self
            .tokens
            .partition_point(|t| t.start() <= offset)
            .checked_sub(1)?;
        let token = &self.tokens[idx];
        (offset < token.end()).then_some(token)
    }

    /// Command name token of a `Command` node.
    pub fn command_name(&self, id: NodeId) -> Option<&Token> {
        let node = self.tree.node(id)?;
        if node.kind != NodeKind::Command {
            return None;
        }
        self.tokens.get(node.tokens.start)
    }

    /// Every bareword in command position: the first token of a `Command`
    /// node, and a bareword directly after a pipe.
    pub fn command_name_tokens(&self) -> Vec<&Token> {
        let mut names: Vec<&Token> = self
            .tree
            .nodes_of_kind(NodeKind::Command)
            .filter_map(|id| self.command_name(id))
            .collect();
        let mut after_pipe = false;
        for (_, token) in self.significant_tokens() {
            // `%` lexes as an operator but is a command alias after a pipe.
            let bareword = token.kind == TokenKind::Generic
                || (token.kind == TokenKind::Operator && token.text() == "%");
            if after_pipe && bareword {
                names.push(token);
            }
            after_pipe = token.kind == TokenKind::Pipe;
        }
        names.sort_by_key(|t| t.start());
        names
    }

    /// Name token of a `FunctionDefinition` node.
    pub fn function_name(&self, id: NodeId) -> Option<&Token> {
        let node = self.tree.node(id)?;
        if node.kind != NodeKind::FunctionDefinition {
            return None;
        }
        self.tokens[node.tokens.clone()]
            .iter()
            .skip(1)
            .find(|t| !t.kind.is_trivia())
            .filter(|t| t.kind == TokenKind::Generic)
    }
}

/// Parses script text into a [`ParsedScript`].
pub trait ScriptParser: Send + Sync {
    fn parse(&self, text: &str) -> ParsedScript;

    fn parse_file(&self, path: &Path) -> std::io::Result<ParsedScript> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.parse(&text))
    }
}

/// The built-in parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardParser;

impl ScriptParser for StandardParser {
    fn parse(&self, text: &str) -> ParsedScript {
        parse(text)
    }
}

/// Parse `text` with the built-in parser.
pub fn parse(text: &str) -> ParsedScript {
    let line_index = LineIndex::new(text);
    let (tokens, mut issues) = lexer::Lexer::new(text, &line_index).tokenize();
    let (tree, tree_issues) = tree::TreeBuilder::new(text, &line_index, &tokens).build();
    issues.extend(tree_issues);
    issues.sort_by_key(|i| i.extent.start_offset);
    ParsedScript {
        text: Arc::from(text),
        line_index,
        tokens,
        tree,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_and_functions() {
        let script = parse("function Get-Thing {\n    gci -Path .\n}\nGet-Thing\n");
        assert!(!script.has_errors());

        let funcs: Vec<_> = script.tree().nodes_of_kind(NodeKind::FunctionDefinition).collect();
        assert_eq!(funcs.len(), 1);
        assert_eq!(script.function_name(funcs[0]).map(Token::text), Some("Get-Thing"));

        let commands: Vec<&str> = script
            .tree()
            .nodes_of_kind(NodeKind::Command)
            .filter_map(|id| script.command_name(id))
            .map(Token::text)
            .collect();
        assert_eq!(commands, vec!["gci", "Get-Thing"]);

        let gci = script.tree().nodes_of_kind(NodeKind::Command).next().unwrap();
        assert_eq!(script.tree().block_depth(gci), 1);
        assert_eq!(script.tree().node(gci).unwrap().extent.text, "gci -Path .");
    }

    #[test]
    fn test_pipeline_continues_over_newline() {
        let script = parse("Get-Item |\n    Remove-Item\nfoo");
        let commands: Vec<_> = script.tree().nodes_of_kind(NodeKind::Command).collect();
        assert_eq!(commands.len(), 2);
        let first = script.tree().node(commands[0]).unwrap();
        assert_eq!(first.extent.start_line, 1);
        assert_eq!(first.extent.end_line, 2);
    }

    #[test]
    fn test_partial_tree_on_errors() {
        let script = parse("if ($x) {\n  foo\n");
        assert!(script.has_errors());
        assert!(script.issues()[0].message.contains("'}'"));
        assert_eq!(script.tree().nodes_of_kind(NodeKind::Command).count(), 1);

        let script = parse("foo }\nbar )");
        assert_eq!(script.issues().len(), 2);
    }

    #[test]
    fn test_command_positions_include_pipeline_elements() {
        let script = parse("gci | ? { $_ } | % { foo }");
        let names: Vec<&str> = script.command_name_tokens().into_iter().map(Token::text).collect();
        assert_eq!(names, vec!["gci", "?", "%", "foo"]);
    }

    #[test]
    fn test_deep_nesting_is_reported_not_followed() {
        for opener in ["{", "(", "@{", "$("] {
            let script = parse(&opener.repeat(100_000));
            assert!(script.issues().iter().any(|i| i.message == "nesting too deep"));
        }

        let src = format!("{}{}\nfoo\n", "{".repeat(300), "}".repeat(300));
        let script = parse(&src);
        assert_eq!(script.issues().len(), 1);
        assert_eq!(script.issues()[0].extent.start_offset, MAX_NESTING);
        let foo = script.tree().nodes_of_kind(NodeKind::Command).last().unwrap();
        assert_eq!(script.command_name(foo).map(Token::text), Some("foo"));
        assert_eq!(script.tree().nodes_of_kind(NodeKind::Block).count(), MAX_NESTING);
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ps1");
        std::fs::write(&path, "gci\n").unwrap();
        let script = StandardParser.parse_file(&path).unwrap();
        assert_eq!(script.text(), "gci\n");
        assert!(StandardParser.parse_file(&dir.path().join("missing.ps1")).is_err());
    }

    #[test]
    fn test_token_at() {
        let script = parse("foo 'a\nb'");
        let t = script.token_at(6).unwrap();
        assert_eq!(t.kind, TokenKind::StringLiteral);
        assert!(script.token_at(3).is_none());
    }
}
