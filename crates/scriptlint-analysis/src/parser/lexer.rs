//! Hand-written lexer for the script language.
//!
//! Scans bytes; every token boundary falls on an ASCII delimiter so slices
//! always land on UTF-8 character boundaries.

use scriptlint_core::types::extent::LineIndex;

use super::token::{Token, TokenKind};
use super::ParseIssue;

const KEYWORDS: &[&str] = &[
    "begin", "break", "catch", "continue", "do", "dynamicparam", "else", "elseif", "end",
    "exit", "filter", "finally", "for", "foreach", "function", "if", "param", "process",
    "return", "switch", "throw", "trap", "try", "until", "while",
];

const DASH_OPERATORS: &[&str] = &[
    "and", "as", "band", "bnot", "bor", "bxor", "ccontains", "ceq", "cge", "cgt", "cle",
    "clike", "clt", "cmatch", "cne", "cnotlike", "cnotmatch", "contains", "creplace", "eq",
    "f", "ge", "gt", "icontains", "ieq", "ilike", "imatch", "in", "ine", "is", "isnot",
    "join", "le", "like", "lt", "match", "ne", "not", "notcontains", "notin", "notlike",
    "notmatch", "or", "replace", "shl", "shr", "split", "xor",
];

const OPERATOR_CHARS: &[u8] = b"=+*/%!<>&.:";

/// Bytes that end a bareword.
fn ends_word(b: u8) -> bool {
    b.is_ascii_whitespace() || b"{}()[];,|\"'=".contains(&b)
}

fn is_variable_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b':' || b >= 0x80
}

pub(crate) struct Lexer<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    index: &'a LineIndex,
    tokens: Vec<Token>,
    issues: Vec<ParseIssue>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(text: &'a str, index: &'a LineIndex) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            index,
            tokens: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub(crate) fn tokenize(mut self) -> (Vec<Token>, Vec<ParseIssue>) {
        while self.pos < self.bytes.len() {
            self.next_token();
        }
        let end = self.bytes.len();
        self.push(TokenKind::EndOfInput, end, end);
        (self.tokens, self.issues)
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            extent: self.index.extent(self.text, start, end),
        });
        self.pos = end;
    }

    fn issue(&mut self, message: &str, start: usize, end: usize) {
        self.issues.push(ParseIssue {
            message: message.to_string(),
            extent: self.index.extent(self.text, start, end),
        });
    }

    fn next_token(&mut self) {
        let start = self.pos;
        let Some(b) = self.peek(0) else {
            return;
        };
        match b {
            b'\n' => self.push(TokenKind::NewLine, start, start + 1),
            b'\r' if self.peek(1) == Some(b'\n') => self.push(TokenKind::NewLine, start, start + 2),
            b' ' | b'\t' | b'\r' | b'\x0c' => self.pos += 1,
            b'#' => {
                let end = self.line_end(start);
                self.push(TokenKind::LineComment, start, end);
            }
            b'<' if self.peek(1) == Some(b'#') => self.block_comment(start),
            b'\'' | b'"' => self.quoted_string(start, b),
            b'@' => self.at_sign(start),
            b'$' => self.dollar(start),
            b'`' => match (self.peek(1), self.peek(2)) {
                (Some(b'\n'), _) => self.push(TokenKind::LineContinuation, start, start + 2),
                (Some(b'\r'), Some(b'\n')) => {
                    self.push(TokenKind::LineContinuation, start, start + 3)
                }
                _ => self.word(start),
            },
            b'{' => self.push(TokenKind::LBrace, start, start + 1),
            b'}' => self.push(TokenKind::RBrace, start, start + 1),
            b'(' => self.push(TokenKind::LParen, start, start + 1),
            b')' => self.push(TokenKind::RParen, start, start + 1),
            b'[' => self.push(TokenKind::LBracket, start, start + 1),
            b']' => self.push(TokenKind::RBracket, start, start + 1),
            b';' => self.push(TokenKind::Semicolon, start, start + 1),
            b',' => self.push(TokenKind::Comma, start, start + 1),
            b'|' => {
                let end = if self.peek(1) == Some(b'|') { start + 2 } else { start + 1 };
                self.push(TokenKind::Pipe, start, end);
            }
            b'-' => self.dash(start),
            b'0'..=b'9' => {
                let end = self.scan_while(start, |c| c.is_ascii_alphanumeric() || c == b'.');
                self.push(TokenKind::Number, start, end);
            }
            b'.' if matches!(self.peek(1), Some(b'\\') | Some(b'/')) => self.word(start),
            _ if OPERATOR_CHARS.contains(&b) => {
                let end = self.scan_while(start, |c| OPERATOR_CHARS.contains(&c));
                self.push(TokenKind::Operator, start, end);
            }
            _ => self.word(start),
        }
    }

    fn scan_while(&self, from: usize, pred: impl Fn(u8) -> bool) -> usize {
        let mut end = from;
        while end < self.bytes.len() && pred(self.bytes[end]) {
            end += 1;
        }
        end
    }

    /// End of the current line, excluding `\r\n` / `\n`.
    fn line_end(&self, from: usize) -> usize {
        let mut end = self.scan_while(from, |c| c != b'\n');
        if end > from && self.bytes[end - 1] == b'\r' {
            end -= 1;
        }
        end
    }

    fn block_comment(&mut self, start: usize) {
        match self.text[start + 2..].find("#>") {
            Some(rel) => self.push(TokenKind::BlockComment, start, start + 2 + rel + 2),
            None => {
                let end = self.bytes.len();
                self.issue("unterminated block comment", start, end);
                self.push(TokenKind::BlockComment, start, end);
            }
        }
    }

    fn quoted_string(&mut self, start: usize, quote: u8) {
        let mut i = start + 1;
        while i < self.bytes.len() {
            let c = self.bytes[i];
            if quote == b'"' && c == b'`' {
                i += 2;
                continue;
            }
            if c == quote {
                if self.bytes.get(i + 1) == Some(&quote) {
                    i += 2;
                    continue;
                }
                self.push(TokenKind::StringLiteral, start, i + 1);
                return;
            }
            i += 1;
        }
        let end = self.bytes.len();
        self.issue("unterminated string literal", start, end);
        self.push(TokenKind::StringLiteral, start, end);
    }

    /// `@"`/`@'` here-strings run until the quote followed by `@` at the
    /// start of a line.
    fn here_string(&mut self, start: usize, quote: u8) {
        let terminator = [b'\n', quote, b'@'];
        let body_start = start + 2;
        let found = self.bytes[body_start..]
            .windows(3)
            .position(|w| w == terminator);
        match found {
            Some(rel) => self.push(TokenKind::StringLiteral, start, body_start + rel + 3),
            None => {
                let end = self.bytes.len();
                self.issue("unterminated here-string", start, end);
                self.push(TokenKind::StringLiteral, start, end);
            }
        }
    }

    fn at_sign(&mut self, start: usize) {
        match self.peek(1) {
            Some(b'{') => self.push(TokenKind::AtLBrace, start, start + 2),
            Some(b'(') => self.push(TokenKind::AtLParen, start, start + 2),
            Some(q @ (b'"' | b'\'')) => self.here_string(start, q),
            Some(c) if is_variable_char(c) => {
                let end = self.scan_while(start + 1, is_variable_char);
                self.push(TokenKind::Variable, start, end);
            }
            _ => self.push(TokenKind::Operator, start, start + 1),
        }
    }

    fn dollar(&mut self, start: usize) {
        match self.peek(1) {
            Some(b'(') => self.push(TokenKind::DollarLParen, start, start + 2),
            Some(b'{') => match self.text[start..].find('}') {
                Some(rel) => self.push(TokenKind::Variable, start, start + rel + 1),
                None => {
                    let end = self.bytes.len();
                    self.issue("unterminated variable name", start, end);
                    self.push(TokenKind::Variable, start, end);
                }
            },
            Some(b'$' | b'?' | b'^' | b'_') => {
                let end = self.scan_while(start + 2, is_variable_char);
                self.push(TokenKind::Variable, start, end);
            }
            Some(c) if is_variable_char(c) => {
                let end = self.scan_while(start + 1, is_variable_char);
                self.push(TokenKind::Variable, start, end);
            }
            _ => self.push(TokenKind::Operator, start, start + 1),
        }
    }

    fn dash(&mut self, start: usize) {
        match self.peek(1) {
            Some(c) if c.is_ascii_alphabetic() => {
                let end = self.scan_while(start + 1, |c| {
                    c.is_ascii_alphanumeric() || c == b'_' || c == b'-'
                });
                let name = self.text[start + 1..end].to_ascii_lowercase();
                let kind = if DASH_OPERATORS.contains(&name.as_str()) {
                    TokenKind::Operator
                } else {
                    TokenKind::Parameter
                };
                // `-Path:value` keeps the colon with the parameter.
                let end = if self.bytes.get(end) == Some(&b':') { end + 1 } else { end };
                self.push(kind, start, end);
            }
            _ => {
                let end = self.scan_while(start + 1, |c| c == b'-' || c == b'=');
                self.push(TokenKind::Operator, start, end);
            }
        }
    }

    fn word(&mut self, start: usize) {
        let mut end = start;
        while end < self.bytes.len() {
            let c = self.bytes[end];
            if c == b'`' && end + 1 < self.bytes.len() && !matches!(self.bytes[end + 1], b'\n' | b'\r')
            {
                end += 2;
                continue;
            }
            if ends_word(c) || (c == b'`' && end > start) {
                break;
            }
            end += 1;
        }
        if end == start {
            // A lone stray byte; keep it as an operator so scanning advances.
            end = start + self.text[start..].chars().next().map_or(1, char::len_utf8);
            self.push(TokenKind::Operator, start, end);
            return;
        }
        let lower = self.text[start..end].to_ascii_lowercase();
        let kind = if KEYWORDS.contains(&lower.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Generic
        };
        self.push(kind, start, end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let index = LineIndex::new(src);
        let (tokens, _) = Lexer::new(src, &index).tokenize();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_command_with_parameters() {
        use TokenKind::*;
        assert_eq!(
            kinds("Get-ChildItem -Path $env:TEMP | Where-Object { $_.Length -gt 10 }"),
            vec![
                Generic, Parameter, Variable, Pipe, Generic, LBrace, Variable, Operator,
                Generic, Operator, Number, RBrace, EndOfInput
            ]
        );
    }

    #[test]
    fn test_comments_and_newlines() {
        use TokenKind::*;
        assert_eq!(
            kinds("# one\r\n<# two\n #>\nfoo"),
            vec![LineComment, NewLine, BlockComment, NewLine, Generic, EndOfInput]
        );
    }

    #[test]
    fn test_strings_and_here_strings() {
        use TokenKind::*;
        assert_eq!(
            kinds("'it''s' \"a`\"b\" @\"\nx\n\"@"),
            vec![StringLiteral, StringLiteral, StringLiteral, EndOfInput]
        );
    }

    #[test]
    fn test_unterminated_string_reports_issue() {
        let src = "'oops";
        let index = LineIndex::new(src);
        let (tokens, issues) = Lexer::new(src, &index).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text(), "'oops");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_keywords_and_line_continuation() {
        use TokenKind::*;
        assert_eq!(
            kinds("function Foo {\n}\nfoo `\n -Bar"),
            vec![
                Keyword, Generic, LBrace, NewLine, RBrace, NewLine, Generic, LineContinuation,
                Parameter, EndOfInput
            ]
        );
    }

    #[test]
    fn test_non_ascii_word() {
        let src = "Write-Output héllo";
        let index = LineIndex::new(src);
        let (tokens, _) = Lexer::new(src, &index).tokenize();
        assert_eq!(tokens[1].text(), "héllo");
    }
}
