use kaleido_tokenizer::TokenKind::*;

use super::parenthesized_list;
use crate::ast::{Node, NodeId};
use crate::parser::{ParseResult, Parser};

const ARGS_CAPACITY: usize = 4;

/// Expressions may nest this deep, counting parentheses and call arguments.
pub const MAX_NESTING: u32 = 256;

/// Binding power of a binary operator; higher binds tighter.
pub fn precedence(op: char) -> Option<u8> {
    match op {
        '<' | '>' => Some(10),
        '+' | '-' => Some(20),
        '*' | '/' => Some(40),
        _ => None,
    }
}

fn operator(p: &Parser<'_>) -> Option<(char, u8)> {
    if !matches!(p.peek_kind(), STAR | SLASH | UNKNOWN) {
        return None;
    }

    let op = p.current_text().chars().next()?;
    precedence(op).map(|prec| (op, prec))
}

pub fn expression(p: &mut Parser<'_>) -> ParseResult<NodeId> {
    if p.depth() >= MAX_NESTING {
        return Err(p.error("Expression nested too deeply"));
    }

    p.nested(|p| {
        let lhs = primary(p)?;
        binary_rhs(p, 0, lhs)
    })
}

/// Folds `(op primary)*` onto `lhs` for every operator binding at least as
/// tight as `min_precedence`.
pub fn binary_rhs(p: &mut Parser<'_>, min_precedence: u8, mut lhs: NodeId) -> ParseResult<NodeId> {
    loop {
        let Some((op, prec)) = operator(p) else {
            return Ok(lhs);
        };
        if prec < min_precedence {
            return Ok(lhs);
        }
        p.advance();

        let mut rhs = primary(p)?;
        if operator(p).is_some_and(|(_, next)| prec < next) {
            rhs = binary_rhs(p, prec + 1, rhs)?;
        }

        lhs = p.alloc_node(Node::Binary { op, lhs, rhs })?;
    }
}

pub fn primary(p: &mut Parser<'_>) -> ParseResult<NodeId> {
    match p.peek_kind() {
        NUMBER => number(p),
        NAME => identifier(p),
        LEFT_PAREN => parenthesized(p),
        _ => Err(p.error("Unknown token!")),
    }
}

pub fn number(p: &mut Parser<'_>) -> ParseResult<NodeId> {
    debug_assert_eq!(p.peek_kind(), NUMBER);

    let Some(value) = p.current().number(p.text()) else {
        return Err(p.error("Invalid number literal"));
    };
    p.advance();
    Ok(p.alloc_node(Node::Number(value))?)
}

pub fn parenthesized(p: &mut Parser<'_>) -> ParseResult<NodeId> {
    debug_assert_eq!(p.peek_kind(), LEFT_PAREN);
    p.advance();

    let inner = expression(p)?;
    if !p.eat(RIGHT_PAREN) {
        return Err(p.error("Expected ')'"));
    }
    Ok(inner)
}

/// A variable reference, or a call when the name is followed by `(`.
pub fn identifier(p: &mut Parser<'_>) -> ParseResult<NodeId> {
    debug_assert_eq!(p.peek_kind(), NAME);

    let name = p.arena().alloc_str(p.current_text())?;
    p.advance();

    if !p.eat(LEFT_PAREN) {
        return Ok(p.alloc_node(Node::Variable(name))?);
    }

    let args = parenthesized_list(
        p,
        ARGS_CAPACITY,
        "Expected ')' or ',' in argument list",
        expression,
    )?;
    Ok(p.alloc_node(Node::Call { callee: name, args })?)
}

#[cfg(test)]
mod tests {
    use kaleido_arena::BumpArena;

    use super::*;
    use crate::parser::ParseError;

    fn parse<R>(text: &str, check: impl FnOnce(&Parser<'_>, ParseResult<NodeId>) -> R) -> R {
        let arena = BumpArena::with_capacity(64 * 1024).unwrap();
        let mut parser = Parser::new(text, &arena).unwrap();
        let result = expression(&mut parser);
        check(&parser, result)
    }

    #[test]
    fn variable() {
        parse("x", |p, result| {
            let id = result.unwrap();
            assert_eq!(p.node(id).unwrap().as_variable(), Some("x"));
            assert!(p.at(EOF));
        });
    }

    #[test]
    fn call_without_arguments() {
        parse("foo()", |p, result| {
            let (callee, args) = p.node(result.unwrap()).unwrap().as_call().unwrap();
            assert_eq!(callee, "foo");
            assert!(args.is_empty());
        });
    }

    #[test]
    fn call_with_arguments() {
        parse("foo(1, bar, baz(2))", |p, result| {
            let (callee, args) = p.node(result.unwrap()).unwrap().as_call().unwrap();
            assert_eq!(callee, "foo");
            assert_eq!(args.len(), 3);
            assert_eq!(p.node(args[0]).unwrap().as_number(), Some(1.0));
            assert_eq!(p.node(args[1]).unwrap().as_variable(), Some("bar"));
            assert_eq!(p.node(args[2]).unwrap().as_call().unwrap().0, "baz");
        });
    }

    #[test]
    fn parentheses_are_transparent() {
        fn number(p: &Parser<'_>, result: ParseResult<NodeId>) -> Option<f64> {
            p.node(result.unwrap()).unwrap().as_number()
        }

        let direct = parse("42", number);
        let wrapped = parse("(42)", number);
        let nested = parse("((42))", number);
        assert_eq!(direct, Some(42.0));
        assert_eq!(wrapped, direct);
        assert_eq!(nested, direct);
    }

    #[test]
    fn missing_close_paren() {
        parse("(1", |p, result| {
            let Err(ParseError::Syntax(error)) = result else {
                panic!("expected a syntax error, got {result:?}");
            };
            assert!(p.node(error.node()).unwrap().is_error());
            assert_eq!(p.diagnostics().len(), 1);
            assert_eq!(p.diagnostics()[0].message(), "Expected ')'");
        });
    }

    #[test]
    fn unknown_token() {
        parse("@", |p, result| {
            assert!(matches!(result, Err(ParseError::Syntax(_))));
            assert_eq!(p.diagnostics()[0].message(), "Unknown token!");
        });
    }

    #[test]
    fn failed_argument_aborts_the_call() {
        parse("foo(1, @)", |p, result| {
            let Err(ParseError::Syntax(error)) = result else {
                panic!("expected a syntax error, got {result:?}");
            };
            assert_eq!(p.node(error.node()), Some(&Node::Error));
            assert_eq!(p.diagnostics()[0].message(), "Unknown token!");
            assert!(p.at(UNKNOWN));
        });
    }

    #[test]
    fn missing_comma_between_arguments() {
        parse("foo(a b)", |p, result| {
            assert!(matches!(result, Err(ParseError::Syntax(_))));
            assert_eq!(p.diagnostics()[0].message(), "Expected ')' or ',' in argument list");
        });
    }

    #[test]
    fn precedence_climbing() {
        parse("a + b * c - d", |p, result| {
            let (op, lhs, rhs) = p.node(result.unwrap()).unwrap().as_binary().unwrap();
            assert_eq!(op, '-');
            assert_eq!(p.node(rhs).unwrap().as_variable(), Some("d"));

            let (op, a, product) = p.node(lhs).unwrap().as_binary().unwrap();
            assert_eq!(op, '+');
            assert_eq!(p.node(a).unwrap().as_variable(), Some("a"));
            assert_eq!(p.node(product).unwrap().as_binary().unwrap().0, '*');
        });
    }

    #[test]
    fn negative_literal_is_not_subtraction() {
        parse("a -1", |p, result| {
            assert_eq!(p.node(result.unwrap()).unwrap().as_variable(), Some("a"));
            assert!(p.at(NUMBER));
        });
    }

    #[test]
    fn exhaustion_is_not_a_syntax_error() {
        let arena = BumpArena::with_capacity(64 * size_of::<Node<'_>>()).unwrap();
        let mut parser = Parser::new("x", &arena).unwrap();
        let result = expression(&mut parser);
        assert!(matches!(result, Err(ParseError::Exhausted(_))), "{result:?}");
    }

    #[test]
    fn nesting_below_the_limit_parses() {
        let depth = MAX_NESTING as usize - 1;
        let text = format!("{}7{}", "(".repeat(depth), ")".repeat(depth));
        parse(&text, |p, result| {
            assert_eq!(p.node(result.unwrap()).unwrap().as_number(), Some(7.0));
            assert_eq!(p.depth(), 0);
            assert!(p.at(EOF));
        });
    }

    #[test]
    fn nesting_past_the_limit_is_an_error() {
        let depth = 20_000;
        let parens = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let calls = format!("{}1{}", "f(".repeat(depth), ")".repeat(depth));

        for text in [parens, calls] {
            parse(&text, |p, result| {
                let Err(ParseError::Syntax(error)) = result else {
                    panic!("expected a syntax error, got {result:?}");
                };
                assert!(p.node(error.node()).unwrap().is_error());
                let messages: Vec<_> = p.diagnostics().iter().map(|d| d.message()).collect();
                assert_eq!(messages, ["Expression nested too deeply"]);
                assert_eq!(p.depth(), 0);
            });
        }
    }
}
