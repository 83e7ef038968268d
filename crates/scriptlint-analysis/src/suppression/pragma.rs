//! Comment pragma scanner.
//!
//! Works on the token stream rather than the tree so suppressions still apply
//! to scripts with parse errors. Grammar (case-insensitive):
//!
//! ```text
//! # <marker>-suppress       Name[(id)][, Name…] [-- justification]
//! # <marker>-suppress-begin Name[(id)][, Name…] [-- justification]
//! # <marker>-suppress-end   Name[, Name…]
//! ```

use regex::Regex;
use scriptlint_core::suppression::RuleSuppression;
use scriptlint_core::types::collections::FxHashMap;

use crate::parser::{Token, TokenKind};

/// Rule name (lower-cased) → every suppression range for that name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionTable {
    entries: FxHashMap<String, Vec<RuleSuppression>>,
}

impl SuppressionTable {
    pub fn insert(&mut self, suppression: RuleSuppression) {
        self.entries
            .entry(suppression.rule_name.to_ascii_lowercase())
            .or_default()
            .push(suppression);
    }

    /// Suppressions recorded under `rule_name`, case-insensitively.
    pub fn for_rule(&self, rule_name: &str) -> &[RuleSuppression] {
        self.entries
            .get(&rule_name.to_ascii_lowercase())
            .map_or(&[], Vec::as_slice)
    }

    /// Total number of suppression ranges.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleSuppression> {
        self.entries.values().flatten()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Line,
    Begin,
    End,
}

#[derive(Debug)]
struct PragmaName {
    name: String,
    id: Option<String>,
}

#[derive(Debug)]
struct Pragma {
    directive: Directive,
    names: Vec<PragmaName>,
    justification: Option<String>,
}

struct OpenRange {
    start_line: u32,
    id: Option<String>,
    justification: Option<String>,
    name: String,
}

/// Builds a [`SuppressionTable`] from a token stream.
#[derive(Debug, Clone)]
pub struct CommentPragmaParser {
    pragma: Regex,
    name: Regex,
}

impl CommentPragmaParser {
    /// Parser for `# <marker>-suppress…` comments.
    pub fn new(marker: &str) -> Self {
        let pattern = format!(
            r"(?i)^#\s*{}-suppress(-begin|-end)?\s+(.+?)\s*$",
            regex::escape(marker)
        );
        // Both patterns are fixed apart from the escaped marker.
        let pragma = Regex::new(&pattern).unwrap_or_else(|e| panic!("pragma regex: {e}"));
        let name = Regex::new(r"^([^()\s]+)(?:\(([^()]*)\))?$")
            .unwrap_or_else(|e| panic!("pragma name regex: {e}"));
        Self { pragma, name }
    }

    /// Scan `tokens` and return every properly formed suppression.
    pub fn parse(&self, tokens: &[Token]) -> SuppressionTable {
        let mut table = SuppressionTable::default();
        let mut open: FxHashMap<String, Vec<OpenRange>> = FxHashMap::default();
        let mut last_code_end_line: Option<u32> = None;

        for (idx, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::LineComment {
                if !token.kind.is_trivia() && token.kind != TokenKind::EndOfInput {
                    last_code_end_line = Some(token.extent.end_line);
                }
                continue;
            }
            let Some(pragma) = self.parse_comment(token.text()) else {
                continue;
            };
            let line = token.extent.start_line;

            match pragma.directive {
                Directive::Line => {
                    let trailing = last_code_end_line == Some(line);
                    let target = if trailing {
                        Some(line)
                    } else {
                        next_code_line(&tokens[idx + 1..])
                    };
                    let Some(target) = target else {
                        continue;
                    };
                    for name in pragma.names {
                        table.insert(RuleSuppression {
                            rule_name: name.name,
                            start_line: target,
                            end_line: target,
                            justification: pragma.justification.clone(),
                            suppression_id: name.id,
                        });
                    }
                }
                Directive::Begin => {
                    for name in pragma.names {
                        open.entry(name.name.to_ascii_lowercase())
                            .or_default()
                            .push(OpenRange {
                                start_line: line,
                                id: name.id,
                                justification: pragma.justification.clone(),
                                name: name.name,
                            });
                    }
                }
                Directive::End => {
                    for name in pragma.names {
                        let Some(range) = open
                            .get_mut(&name.name.to_ascii_lowercase())
                            .and_then(Vec::pop)
                        else {
                            continue;
                        };
                        table.insert(RuleSuppression {
                            rule_name: range.name,
                            start_line: range.start_line,
                            end_line: line,
                            justification: range.justification,
                            suppression_id: range.id,
                        });
                    }
                }
            }
        }
        table
    }

    fn parse_comment(&self, text: &str) -> Option<Pragma> {
        let caps = self.pragma.captures(text)?;
        let directive = match caps.get(1).map(|m| m.as_str().to_ascii_lowercase()) {
            None => Directive::Line,
            Some(s) if s == "-begin" => Directive::Begin,
            Some(_) => Directive::End,
        };
        let rest = caps.get(2)?.as_str();
        let (names_part, justification) = match rest.find("--") {
            Some(i) => {
                let j = rest[i + 2..].trim();
                (&rest[..i], (!j.is_empty()).then(|| j.to_string()))
            }
            None => (rest, None),
        };
        let names: Vec<PragmaName> = names_part
            .split(',')
            .map(str::trim)
            .filter_map(|part| {
                let caps = self.name.captures(part)?;
                Some(PragmaName {
                    name: caps.get(1)?.as_str().to_string(),
                    id: caps
                        .get(2)
                        .map(|m| m.as_str().trim().to_string())
                        .filter(|id| !id.is_empty()),
                })
            })
            .collect();
        if names.is_empty() {
            return None;
        }
        Some(Pragma {
            directive,
            names,
            justification,
        })
    }
}

impl Default for CommentPragmaParser {
    fn default() -> Self {
        Self::new("scriptlint")
    }
}

/// Line of the next code token, skipping comments and newlines.
fn next_code_line(tokens: &[Token]) -> Option<u32> {
    tokens
        .iter()
        .take_while(|t| t.kind != TokenKind::EndOfInput)
        .find(|t| !t.kind.is_trivia())
        .map(|t| t.extent.start_line)
}
