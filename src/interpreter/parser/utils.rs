use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Location, Token},
        parser::core::ParseResult,
    },
};

/// Builds the error for a token the grammar does not allow here.
pub(in crate::interpreter::parser) fn unexpected(token: &Token,
                                                 location: Location,
                                                 expected: &str)
                                                 -> ParseError {
    ParseError::UnexpectedToken { kind:     token.kind_name(),
                                  token:    token.to_string(),
                                  expected: expected.to_string(),
                                  line:     location.line,
                                  offset:   location.offset, }
}

/// Builds the error for input that stops in the middle of a construct.
pub(in crate::interpreter::parser) fn end_of_input(expected: &str) -> ParseError {
    ParseError::UnexpectedEndOfInput { expected: expected.to_string() }
}

/// Consumes the next token, which must equal `expected`.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the expected token.
/// - `expected`: The required token.
///
/// # Returns
/// The location of the consumed token.
///
/// # Errors
/// Returns a `ParseError` if the next token differs or the input ends.
pub(in crate::interpreter::parser) fn expect_token<'a, I>(tokens: &mut Peekable<I>,
                                                          expected: &Token)
                                                          -> ParseResult<Location>
    where I: Iterator<Item = &'a (Token, Location)>
{
    match tokens.next() {
        Some((tok, location)) if tok == expected => Ok(*location),
        Some((tok, location)) => Err(unexpected(tok, *location, &format!("'{expected}'"))),
        None => Err(end_of_input(&format!("'{expected}'"))),
    }
}

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by array literals, argument lists and parameter
/// lists. It repeatedly calls `parse_item` to parse one element, expecting
/// either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list. The
/// closing token is consumed.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (`]` or `)`).
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut items = Vec::new();
    if let Some((tok, _)) = tokens.peek()
       && tok == closing
    {
        tokens.next();

        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((tok, _)) if tok == closing => break,
            Some((tok, location)) => {
                return Err(unexpected(tok, *location, &format!("',' or '{closing}'")));
            },
            None => return Err(end_of_input(&format!("',' or '{closing}'"))),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier or the input
/// ends.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, Location)>
{
    match tokens.next() {
        Some((Token::Identifier(s), _)) => Ok(s.clone()),
        Some((tok, location)) => Err(unexpected(tok, *location, "an identifier")),
        None => Err(end_of_input("an identifier")),
    }
}
