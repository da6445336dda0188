//! Recursive-descent parser producing an arena-allocated AST.

mod ast;
pub mod grammar;
mod parser;

use kaleido_arena::{AllocError, Array, BumpArena};
use kaleido_tokenizer::TokenKind::*;

pub use ast::{ErrorNode, Function, Item, Module, Node, NodeId, NodeKind, Prototype};
pub use parser::{ParseError, ParseResult, Parser};

const ITEMS_CAPACITY: usize = 16;

/// Parses every top-level item of `text`, storing the tree in `arena`.
///
/// Syntax errors are part of the returned module. The only failure is running
/// out of arena space, which stops the parse.
pub fn module<'a>(text: &'a str, arena: &'a BumpArena) -> Result<Module<'a>, AllocError> {
    let mut parser = Parser::new(text, arena)?;
    let mut items = Array::with_capacity_in(ITEMS_CAPACITY, arena)?;

    while !parser.at(EOF) {
        if parser.eat(SEMICOLON) {
            continue;
        }

        let item = grammar::items::item(&mut parser)?;
        tracing::trace!(?item, "parsed item");
        items.push(item)?;
    }

    Ok(parser.finish(items))
}
