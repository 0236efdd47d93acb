use std::iter::Peekable;

use crate::{
    ast::{AssignTarget, Call, FunctionDef, Program, Statement},
    interpreter::{
        lexer::{Location, Token},
        parser::{
            block::parse_block,
            core::{ParseResult, parse_condition, parse_expression},
            unary::{parse_index, parse_script_call},
            utils::{
                end_of_input, expect_token, parse_comma_separated, parse_identifier, unexpected,
            },
        },
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - an assignment to a variable or an array element,
/// - a function call or external script call used for its effect,
/// - an `if` or `while` statement,
/// - a function definition,
/// - a `return`.
///
/// There is no statement terminator; a statement ends where the grammar says
/// it ends and the next one starts right after.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, Location)` pairs.
///
/// # Returns
/// A parsed [`Statement`] node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    match tokens.peek() {
        Some((Token::If, location)) => {
            tokens.next();
            parse_if(tokens, location.line)
        },
        Some((Token::While, location)) => {
            tokens.next();
            parse_while(tokens, location.line)
        },
        Some((Token::Function, location)) => {
            tokens.next();
            parse_function_definition(tokens, location.line)
        },
        Some((Token::Return, location)) => {
            tokens.next();
            parse_return(tokens, location.line)
        },
        Some((Token::Script(_), _)) => Ok(Statement::ScriptCall(parse_script_call(tokens)?)),
        Some((Token::Identifier(_), _)) => parse_identifier_statement(tokens),
        Some((tok, location)) => Err(unexpected(tok, *location, "a statement")),
        None => Err(end_of_input("a statement")),
    }
}

/// Parses a statement that starts with an identifier.
///
/// One token of lookahead past the name decides the form:
///
/// - `name = expression`
/// - `name [ expression ] = expression`
/// - `name ( arguments )`
fn parse_identifier_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let line = tokens.peek().map_or(0, |(_, location)| location.line);
    let name = parse_identifier(tokens)?;

    match tokens.peek() {
        Some((Token::Equals, _)) => {
            tokens.next();
            let value = parse_expression(tokens)?;
            Ok(Statement::Assign { target: AssignTarget::Variable(name),
                                   value,
                                   line })
        },
        Some((Token::LBracket, _)) => {
            let index = parse_index(tokens)?;
            expect_token(tokens, &Token::Equals)?;
            let value = parse_expression(tokens)?;
            Ok(Statement::Assign { target: AssignTarget::Element { name, index },
                                   value,
                                   line })
        },
        Some((Token::LParen, _)) => {
            tokens.next();
            let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen)?;
            Ok(Statement::Call(Call { name,
                                      arguments,
                                      line }))
        },
        Some((tok, location)) => Err(unexpected(tok, *location, "'=', '[' or '('")),
        None => Err(end_of_input("'=', '[' or '('")),
    }
}

/// Parses an `if` statement with an optional `else` branch.
///
/// Syntax:
/// ```text
///     if <condition> begin <program> end
///     if <condition> begin <program> else <program> end
/// ```
/// The `else` branch is not introduced by another `begin`; a single `end`
/// closes the whole statement.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `if` keyword.
/// - `line`: Line number of the `if` token.
///
/// # Errors
/// - `UnexpectedToken` if `begin` or `end` is missing.
/// - Propagates any errors from condition or body parsing.
fn parse_if<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let condition = parse_condition(tokens)?;
    let then_branch = parse_begin_body(tokens)?;

    let else_branch = match tokens.peek() {
        Some((Token::Else, _)) => {
            tokens.next();
            Some(parse_block(tokens)?)
        },
        _ => None,
    };
    expect_token(tokens, &Token::End)?;

    Ok(Statement::If { condition,
                       then_branch,
                       else_branch,
                       line })
}

/// Parses `while <condition> begin <program> end`.
fn parse_while<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let condition = parse_condition(tokens)?;
    let body = parse_begin_body(tokens)?;
    expect_token(tokens, &Token::End)?;

    Ok(Statement::While { condition,
                          body,
                          line })
}

/// Parses a function definition.
///
/// Syntax: `function <name> ( <params> ) begin <program> end`
///
/// Parameters are parsed as expressions and validated when the definition
/// executes, so `function f(1) begin end` is syntactically valid but fails at
/// run time.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `function` keyword.
/// - `line`: Line number of the `function` token.
fn parse_function_definition<'a, I>(tokens: &mut Peekable<I>,
                                    line: usize)
                                    -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let name = parse_identifier(tokens)?;
    expect_token(tokens, &Token::LParen)?;
    let params = parse_comma_separated(tokens, parse_expression, &Token::RParen)?;
    let body = parse_begin_body(tokens)?;
    expect_token(tokens, &Token::End)?;

    Ok(Statement::FunctionDef(FunctionDef { name,
                                            params,
                                            body,
                                            line }))
}

/// Parses `return` with its optional condition.
///
/// The condition is present only if the next token can start one; otherwise
/// the statement returns null and the following token begins the next
/// statement.
fn parse_return<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let value = match tokens.peek() {
        Some((tok, _)) if tok.starts_condition() => Some(parse_condition(tokens)?),
        _ => None,
    };

    Ok(Statement::Return { value, line })
}

/// Parses `begin <program>`, leaving the terminating `end` or `else` in the
/// stream.
fn parse_begin_body<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Program>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    expect_token(tokens, &Token::Begin)?;
    parse_block(tokens)
}
