use kaleido_arena::{AllocError, Array, BumpArena};
use kaleido_errors::Diagnostic;
use kaleido_tokenizer::TokenKind::{self, *};
use kaleido_tokenizer::{Token, Tokenizer};
use thiserror::Error;

use crate::ast::{ErrorNode, Item, Module, Node, NodeId};

const NODES_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The production failed; its [`Node::Error`] is already in the node
    /// sequence and its message in the diagnostics.
    #[error("syntax error")]
    Syntax(ErrorNode),

    #[error(transparent)]
    Exhausted(#[from] AllocError),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// State of one parse: the tokenizer, one token of lookahead, the node
/// sequence and the diagnostics emitted so far.
pub struct Parser<'a> {
    text: &'a str,
    arena: &'a BumpArena,
    tokenizer: Tokenizer<'a>,
    current: Token,
    nodes: Array<Node<'a>, &'a BumpArena>,
    diagnostics: Vec<Diagnostic>,
    depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str, arena: &'a BumpArena) -> Result<Self, AllocError> {
        let mut tokenizer = Tokenizer::new(text);
        let current = tokenizer.next_token();
        let nodes = Array::with_capacity_in(NODES_CAPACITY, arena)?;

        Ok(Self { text, arena, tokenizer, current, nodes, diagnostics: Vec::new(), depth: 0 })
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn arena(&self) -> &'a BumpArena {
        self.arena
    }

    pub fn current(&self) -> Token {
        self.current
    }

    pub fn current_text(&self) -> &'a str {
        self.current.text(self.text)
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.current.kind
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub fn at_keyword(&self, keyword: &str) -> bool {
        self.at(NAME) && self.current.is(self.text, keyword)
    }

    pub fn advance(&mut self) {
        if self.at(EOF) {
            return;
        }

        self.current = self.tokenizer.next_token();
    }

    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Number of [`Parser::nested`] calls currently open.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    pub fn alloc_node(&mut self, node: Node<'a>) -> Result<NodeId, AllocError> {
        let id = NodeId::try_new(self.nodes.len()).ok_or(AllocError::CapacityOverflow)?;
        self.nodes.push(node)?;
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<'a>> {
        self.nodes.get(id.index())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Reports `message` at the current token and appends the error node.
    pub fn error(&mut self, message: &str) -> ParseError {
        tracing::debug!(message, range = ?self.current.range, "parse error");
        self.diagnostics.push(Diagnostic::error(message, self.current.range));

        match self.alloc_node(Node::Error) {
            Ok(id) => ParseError::Syntax(ErrorNode(id)),
            Err(err) => err.into(),
        }
    }

    pub fn finish(self, items: Array<Item<'a>, &'a BumpArena>) -> Module<'a> {
        let Parser { nodes, diagnostics, .. } = self;
        Module { nodes, items, diagnostics }
    }
}
