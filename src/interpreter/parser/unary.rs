use std::iter::Peekable;

use crate::{
    ast::{Call, Expr, LiteralValue, ScriptCall, UnaryOperator},
    interpreter::{
        lexer::{Location, Token},
        parser::{
            core::{ParseResult, parse_condition, parse_expression},
            utils::{end_of_input, expect_token, parse_comma_separated, unexpected},
        },
    },
};

/// Parses a logical negation.
///
/// `not` binds looser than every arithmetic and relational operator of its
/// operand but tighter than `and`/`or`, and it may repeat.
///
/// Grammar: `boolfactor := "not" boolfactor | expression`
pub(crate) fn parse_not<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    if let Some((Token::Not, location)) = tokens.peek() {
        tokens.next();
        let expr = parse_not(tokens)?;
        Ok(Expr::UnaryOp { op:   UnaryOperator::Not,
                           expr: Box::new(expr),
                           line: location.line, })
    } else {
        parse_expression(tokens)
    }
}

/// Parses a factor, the highest-precedence level.
///
/// Prefix operators are right-associative, so `-itoa x` is parsed as
/// `-(itoa x)`. Casts may be written either as a keyword prefix (`itoa x`) or
/// as a parenthesized keyword (`(itoa) x`).
///
/// Grammar:
/// ```text
///     factor := "-" factor
///             | ("itoa" | "atoi") factor
///             | "(" ("itoa" | "atoi") ")" factor
///             | "(" condition ")"
///             | primary
/// ```
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// An [`Expr::UnaryOp`] or a primary expression.
pub(crate) fn parse_factor<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    match tokens.peek() {
        Some((Token::Minus, location)) => {
            tokens.next();
            parse_prefixed(tokens, UnaryOperator::Negate, location.line)
        },
        Some((Token::Itoa, location)) => {
            tokens.next();
            parse_prefixed(tokens, UnaryOperator::Itoa, location.line)
        },
        Some((Token::Atoi, location)) => {
            tokens.next();
            parse_prefixed(tokens, UnaryOperator::Atoi, location.line)
        },
        Some((Token::LParen, location)) => {
            if let Some(op) = parenthesized_cast(tokens) {
                tokens.next();
                tokens.next();
                tokens.next();
                return parse_prefixed(tokens, op, location.line);
            }
            parse_grouping(tokens)
        },
        _ => parse_primary(tokens),
    }
}

/// Parses the operand of a prefix operator and wraps it.
fn parse_prefixed<'a, I>(tokens: &mut Peekable<I>,
                         op: UnaryOperator,
                         line: usize)
                         -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let expr = parse_factor(tokens)?;
    Ok(Expr::UnaryOp { op,
                       expr: Box::new(expr),
                       line })
}

/// Looks ahead for `( itoa )` or `( atoi )` without consuming anything.
fn parenthesized_cast<'a, I>(tokens: &Peekable<I>) -> Option<UnaryOperator>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut lookahead = tokens.clone();
    lookahead.next();
    let op = match lookahead.next() {
        Some((Token::Itoa, _)) => UnaryOperator::Itoa,
        Some((Token::Atoi, _)) => UnaryOperator::Atoi,
        _ => return None,
    };
    match lookahead.next() {
        Some((Token::RParen, _)) => Some(op),
        _ => None,
    }
}

/// Parses a parenthesized condition.
///
/// The inner node is returned as is, so a parenthesized `and`/`or` chain can
/// be extended by a following operator of the same kind.
fn parse_grouping<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    expect_token(tokens, &Token::LParen)?;
    let expr = parse_condition(tokens)?;
    expect_token(tokens, &Token::RParen)?;
    Ok(expr)
}

/// Parses a primary (atomic) expression.
///
/// Grammar (simplified):
/// ```text
///     primary := NUMBER | STR | "true" | "false"
///              | ID | ID "[" expression "]" | ID "(" arguments ")"
///              | "[" arguments "]"
///              | CALLPY "(" arguments ")"
/// ```
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of a primary expression.
///
/// # Returns
/// The parsed primary [`Expr`] or a `ParseError` on failure.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let Some(peeked) = tokens.peek() else {
        return Err(end_of_input("an expression"));
    };

    match peeked {
        (Token::Integer(..) | Token::Float(..) | Token::Bool(..) | Token::Str(..), _) => {
            parse_literal(tokens)
        },
        (Token::LBracket, _) => parse_array_literal(tokens),
        (Token::Script(_), _) => Ok(Expr::ScriptCall(parse_script_call(tokens)?)),
        (Token::Identifier(_), _) => parse_identifier_expression(tokens),
        (tok, location) => Err(unexpected(tok, *location, "an expression")),
    }
}

/// Parses a literal token into an [`Expr::Literal`].
fn parse_literal<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let (value, location) = match tokens.next() {
        Some((Token::Integer(n), location)) => (LiteralValue::Integer(*n), location),
        Some((Token::Float(r), location)) => (LiteralValue::Float(*r), location),
        Some((Token::Bool(b), location)) => (LiteralValue::Bool(*b), location),
        Some((Token::Str(s), location)) => (LiteralValue::Str(s.clone()), location),
        Some((tok, location)) => return Err(unexpected(tok, *location, "a literal")),
        None => return Err(end_of_input("a literal")),
    };
    Ok(Expr::Literal { value,
                       line: location.line })
}

/// Parses an array literal of the form `[ expr1, expr2, ..., exprN ]`.
///
/// An empty array `[]` is accepted.
///
/// Grammar: `array := "[" (expression ("," expression)*)? "]"`.
fn parse_array_literal<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let location = expect_token(tokens, &Token::LBracket)?;
    let elements = parse_comma_separated(tokens, parse_expression, &Token::RBracket)?;

    Ok(Expr::ArrayLiteral { elements,
                            line: location.line })
}

/// Parses an identifier and what follows it: a call, an element read, or
/// nothing (a plain variable reference).
fn parse_identifier_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let Some((Token::Identifier(name), location)) = tokens.next() else {
        return Err(end_of_input("an identifier"));
    };

    match tokens.peek() {
        Some((Token::LParen, _)) => {
            tokens.next();
            let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen)?;
            Ok(Expr::FunctionCall(Call { name: name.clone(),
                                         arguments,
                                         line: location.line }))
        },
        Some((Token::LBracket, _)) => {
            let index = parse_index(tokens)?;
            Ok(Expr::ArrayItem { name:  name.clone(),
                                 index: Box::new(index),
                                 line:  location.line, })
        },
        _ => Ok(Expr::Variable { name: name.clone(),
                                 line: location.line, }),
    }
}

/// Parses `[ expression ]` and returns the index expression.
pub(crate) fn parse_index<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    expect_token(tokens, &Token::LBracket)?;
    let index = parse_expression(tokens)?;
    expect_token(tokens, &Token::RBracket)?;
    Ok(index)
}

/// Parses an external script call: `CALLPY "(" arguments ")"`.
pub(crate) fn parse_script_call<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ScriptCall>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let (path, location) = match tokens.next() {
        Some((Token::Script(path), location)) => (path.clone(), location),
        Some((tok, location)) => return Err(unexpected(tok, *location, "a script reference")),
        None => return Err(end_of_input("a script reference")),
    };
    expect_token(tokens, &Token::LParen)?;
    let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen)?;

    Ok(ScriptCall { path,
                    arguments,
                    line: location.line })
}
