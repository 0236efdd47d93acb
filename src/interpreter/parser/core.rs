use std::iter::Peekable;

use crate::{
    ast::{Expr, Program},
    error::ParseError,
    interpreter::{
        lexer::{Location, Token},
        parser::{
            binary::{parse_additive, parse_or_chain},
            block::parse_block,
            utils::unexpected,
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a whole source file.
///
/// This is the entry point of the parser. Statements are read until the
/// token stream is exhausted; a stray `end` or `else` at the top level is a
/// syntax error.
///
/// Grammar: `program := statement*`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, Location)` pairs.
///
/// # Returns
/// The root [`Program`] node.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Program>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let program = parse_block(tokens)?;

    match tokens.peek() {
        None => Ok(program),
        Some((tok, location)) => Err(unexpected(tok, *location, "a statement")),
    }
}

/// Parses a condition, the lowest-precedence level of the expression grammar.
///
/// Conditions appear after `if`, `while` and `return`, and inside
/// parentheses.
///
/// Grammar: `condition := boolexpression ("or" boolexpression)*`
pub fn parse_condition<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    parse_or_chain(tokens)
}

/// Parses an arithmetic expression.
///
/// Assignment values, array elements, call arguments and indexes are parsed at
/// this level, so a relational or boolean operator there must be
/// parenthesized.
///
/// Grammar: `expression := term (("+" | "-") term)*`
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    parse_additive(tokens)
}
