//! Statement/block tree built over the token stream.
//!
//! The tree is an arena of nodes referring back to token index ranges, so
//! rules can move freely between structural and lexical views.

use std::ops::Range;

use scriptlint_core::types::extent::{LineIndex, ScriptExtent};
use serde::Serialize;

use super::token::{Token, TokenKind};
use super::ParseIssue;

/// Index of a node in [`ScriptTree::nodes`].
pub type NodeId = usize;

/// Deepest brace/paren nesting the builder descends into. Anything deeper
/// is skipped as one flat region and reported.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    /// The whole script; always node 0.
    Script,
    /// A `{ … }` or `@{ … }` scope, braces included.
    Block,
    /// A statement that is neither a command nor a function definition.
    Statement,
    /// A statement starting with a bareword command name.
    Command,
    /// `function <name> { … }` or `filter <name> { … }`.
    FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub extent: ScriptExtent,
    /// Token indices covered, in the owning script's token vector.
    pub tokens: Range<usize>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena-backed syntax tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScriptTree {
    nodes: Vec<Node>,
}

impl ScriptTree {
    pub const ROOT: NodeId = 0;

    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Ids of all nodes of `kind`, in source order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.kind == kind)
            .map(|(id, _)| id)
    }

    /// Number of enclosing `Block` nodes.
    pub fn block_depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            if self.nodes[p].kind == NodeKind::Block {
                depth += 1;
            }
            current = self.nodes[p].parent;
        }
        depth
    }
}

/// Recursive-descent builder over a finished token vector.
pub(crate) struct TreeBuilder<'a> {
    text: &'a str,
    index: &'a LineIndex,
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    nodes: Vec<Node>,
    issues: Vec<ParseIssue>,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(text: &'a str, index: &'a LineIndex, tokens: &'a [Token]) -> Self {
        Self {
            text,
            index,
            tokens,
            pos: 0,
            depth: 0,
            nodes: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub(crate) fn build(mut self) -> (ScriptTree, Vec<ParseIssue>) {
        let root = self.open(NodeKind::Script, None);
        self.statements(root, false);
        self.close(root, 0, self.tokens.len());
        self.nodes[root].extent = self.index.extent(self.text, 0, self.text.len());
        (ScriptTree { nodes: self.nodes }, self.issues)
    }

    fn kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos)
            .map_or(TokenKind::EndOfInput, |t| t.kind)
    }

    fn open(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            extent: ScriptExtent::default(),
            tokens: self.pos..self.pos,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(id);
        }
        id
    }

    /// Finish a node over tokens `[first, end)`, trimming trivia at both ends
    /// for the text extent.
    fn close(&mut self, id: NodeId, first: usize, end: usize) {
        self.nodes[id].tokens = first..end;
        let significant: Vec<&Token> = self.tokens[first..end]
            .iter()
            .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::EndOfInput)
            .collect();
        if let (Some(a), Some(b)) = (significant.first(), significant.last()) {
            self.nodes[id].extent = self.index.extent(self.text, a.start(), b.end());
        }
    }

    fn issue(&mut self, message: &str, at: usize) {
        let (start, end) = self
            .tokens
            .get(at)
            .map_or((self.text.len(), self.text.len()), |t| (t.start(), t.end()));
        self.issues.push(ParseIssue {
            message: message.to_string(),
            extent: self.index.extent(self.text, start, end),
        });
    }

    /// Parse statements until end of input, or until a closing brace when
    /// `in_block` (the brace is left for the caller).
    fn statements(&mut self, parent: NodeId, in_block: bool) {
        loop {
            match self.kind() {
                TokenKind::EndOfInput => return,
                TokenKind::RBrace if in_block => return,
                TokenKind::RBrace => {
                    self.issue("unexpected '}'", self.pos);
                    self.pos += 1;
                }
                TokenKind::RParen => {
                    self.issue("unexpected ')'", self.pos);
                    self.pos += 1;
                }
                k if k.is_trivia() || k == TokenKind::Semicolon => self.pos += 1,
                _ => self.statement(parent),
            }
        }
    }

    fn statement(&mut self, parent: NodeId) {
        let first = self.pos;
        let kind = match self.tokens[first].kind {
            TokenKind::Generic => NodeKind::Command,
            TokenKind::Keyword
                if self.tokens[first].is_keyword("function")
                    || self.tokens[first].is_keyword("filter") =>
            {
                NodeKind::FunctionDefinition
            }
            _ => NodeKind::Statement,
        };
        let id = self.open(kind, Some(parent));
        let mut continues = false;
        loop {
            match self.kind() {
                TokenKind::EndOfInput | TokenKind::RBrace | TokenKind::Semicolon => break,
                TokenKind::NewLine if !continues => break,
                TokenKind::RParen => {
                    self.issue("unexpected ')'", self.pos);
                    self.pos += 1;
                }
                k if k.opens_brace() => {
                    self.block(id);
                    continues = false;
                }
                k if k.opens_paren() => {
                    self.group(id);
                    continues = false;
                }
                k => {
                    if !k.is_trivia() {
                        continues = k == TokenKind::Pipe;
                    }
                    self.pos += 1;
                }
            }
        }
        let end = self.pos;
        self.close(id, first, end);
    }

    fn block(&mut self, parent: NodeId) {
        if self.depth >= MAX_NESTING {
            self.skip_nested();
            return;
        }
        self.depth += 1;
        let first = self.pos;
        let id = self.open(NodeKind::Block, Some(parent));
        self.pos += 1;
        self.statements(id, true);
        if self.kind() == TokenKind::RBrace {
            self.pos += 1;
        } else {
            self.issue("missing closing '}'", first);
        }
        let end = self.pos;
        self.close(id, first, end);
        self.depth -= 1;
    }

    /// Parenthesised group: newlines do not end it, braces inside open blocks.
    fn group(&mut self, parent: NodeId) {
        if self.depth >= MAX_NESTING {
            self.skip_nested();
            return;
        }
        self.depth += 1;
        let open = self.pos;
        self.pos += 1;
        loop {
            match self.kind() {
                TokenKind::EndOfInput | TokenKind::RBrace => {
                    self.issue("missing closing ')'", open);
                    break;
                }
                TokenKind::RParen => {
                    self.pos += 1;
                    break;
                }
                k if k.opens_brace() => self.block(parent),
                k if k.opens_paren() => self.group(parent),
                _ => self.pos += 1,
            }
        }
        self.depth -= 1;
    }

    /// Step over the bracketed region opening at `pos` without building
    /// nodes, counting braces and parens alike.
    fn skip_nested(&mut self) {
        self.issue("nesting too deep", self.pos);
        let mut open = 0usize;
        loop {
            match self.kind() {
                TokenKind::EndOfInput => return,
                k if k.opens_brace() || k.opens_paren() => open += 1,
                TokenKind::RBrace | TokenKind::RParen => {
                    open = open.saturating_sub(1);
                    if open == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
    }
}
