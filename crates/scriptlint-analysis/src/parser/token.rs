//! Token types produced by the lexer.

use scriptlint_core::types::extent::ScriptExtent;
use serde::Serialize;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    LineComment,
    BlockComment,
    StringLiteral,
    Variable,
    Number,
    Parameter,
    Generic,
    Keyword,
    LBrace,
    AtLBrace,
    RBrace,
    LParen,
    AtLParen,
    DollarLParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Pipe,
    Operator,
    LineContinuation,
    NewLine,
    EndOfInput,
}

impl TokenKind {
    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    /// Comments, newlines, and line continuations.
    pub fn is_trivia(self) -> bool {
        self.is_comment() || matches!(self, Self::NewLine | Self::LineContinuation)
    }

    /// Opens a brace-delimited scope (`{` or `@{`).
    pub fn opens_brace(self) -> bool {
        matches!(self, Self::LBrace | Self::AtLBrace)
    }

    /// Opens a parenthesised group (`(`, `@(`, `$(`).
    pub fn opens_paren(self) -> bool {
        matches!(self, Self::LParen | Self::AtLParen | Self::DollarLParen)
    }
}

/// One lexical token with its source extent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub extent: ScriptExtent,
}

impl Token {
    pub fn text(&self) -> &str {
        &self.extent.text
    }

    pub fn start(&self) -> usize {
        self.extent.start_offset
    }

    pub fn end(&self) -> usize {
        self.extent.end_offset
    }

    /// True when the token is a keyword matching `word` case-insensitively.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text().eq_ignore_ascii_case(word)
    }
}
