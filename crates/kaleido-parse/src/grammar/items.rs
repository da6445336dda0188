use kaleido_arena::AllocError;
use kaleido_tokenizer::TokenKind::*;

use super::exprs::expression;
use super::parenthesized_list;
use crate::ast::{Function, Item, Prototype};
use crate::parser::{ParseError, ParseResult, Parser};

/// Name given to the function wrapping a top-level expression.
pub const ANONYMOUS_FUNCTION: &str = "__anon_expr";

const PARAMS_CAPACITY: usize = 4;

/// Parses one top-level item. A syntax error becomes [`Item::Error`] after
/// skipping one token; only arena exhaustion is returned as an error.
pub fn item<'a>(p: &mut Parser<'a>) -> Result<Item<'a>, AllocError> {
    let result = if p.at_keyword("def") {
        definition(p).map(Item::Definition)
    } else if p.at_keyword("extern") {
        extern_(p).map(Item::Extern)
    } else {
        top_level_expression(p).map(Item::Expression)
    };

    match result {
        Ok(item) => Ok(item),
        Err(ParseError::Syntax(error)) => {
            p.advance();
            Ok(Item::Error(error))
        }
        Err(ParseError::Exhausted(err)) => Err(err),
    }
}

pub fn definition<'a>(p: &mut Parser<'a>) -> ParseResult<Function<'a>> {
    debug_assert!(p.at_keyword("def"));
    p.advance();

    let prototype = prototype(p)?;
    let body = expression(p)?;
    Ok(Function { prototype, body })
}

pub fn extern_<'a>(p: &mut Parser<'a>) -> ParseResult<Prototype<'a>> {
    debug_assert!(p.at_keyword("extern"));
    p.advance();
    prototype(p)
}

pub fn top_level_expression<'a>(p: &mut Parser<'a>) -> ParseResult<Function<'a>> {
    let body = expression(p)?;
    Ok(Function { prototype: Prototype { name: ANONYMOUS_FUNCTION, params: &[] }, body })
}

pub fn prototype<'a>(p: &mut Parser<'a>) -> ParseResult<Prototype<'a>> {
    if !p.at(NAME) {
        return Err(p.error("Expected function name in prototype"));
    }
    let name = p.arena().alloc_str(p.current_text())?;
    p.advance();

    if !p.eat(LEFT_PAREN) {
        return Err(p.error("Expected '(' in prototype"));
    }

    let params =
        parenthesized_list(p, PARAMS_CAPACITY, "Expected ')' or ',' in prototype", param)?;
    Ok(Prototype { name, params })
}

fn param<'a>(p: &mut Parser<'a>) -> ParseResult<&'a str> {
    if !p.at(NAME) {
        return Err(p.error("Expected parameter name in prototype"));
    }

    let name = p.arena().alloc_str(p.current_text())?;
    p.advance();
    Ok(name)
}
