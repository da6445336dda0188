use kaleido_arena::Array;
use kaleido_tokenizer::TokenKind::*;

use crate::parser::{ParseResult, Parser};

pub mod exprs;
pub mod items;

/// Parses `element (',' element)* ')'` or a bare `)`, with the opening
/// parenthesis already consumed.
pub(crate) fn parenthesized_list<'a, T: Copy>(
    p: &mut Parser<'a>,
    capacity: usize,
    unexpected_delim_message: &'static str,
    mut element: impl FnMut(&mut Parser<'a>) -> ParseResult<T>,
) -> ParseResult<&'a [T]> {
    let mut list = Array::with_capacity_in(capacity, p.arena())?;

    if !p.at(RIGHT_PAREN) {
        loop {
            list.push(element(p)?)?;

            if p.at(RIGHT_PAREN) {
                break;
            }
            if !p.eat(COMMA) {
                return Err(p.error(unexpected_delim_message));
            }
        }
    }

    p.advance();
    Ok(list.into_arena_slice())
}
