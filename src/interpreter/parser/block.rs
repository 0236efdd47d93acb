use std::iter::Peekable;

use crate::{
    ast::Program,
    interpreter::{
        lexer::{Location, Token},
        parser::{core::ParseResult, statement::parse_statement},
    },
};

/// Parses a sequence of statements.
///
/// Parsing stops, without consuming anything, at `end`, at `else`, or when
/// the input runs out. The caller decides whether that terminator is legal.
///
/// Grammar: `block := statement*`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the first statement.
///
/// # Returns
/// The statements as a [`Program`].
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Program>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut statements = Vec::new();

    while let Some((tok, _)) = tokens.peek() {
        if matches!(tok, Token::End | Token::Else) {
            break;
        }
        statements.push(parse_statement(tokens)?);
    }

    Ok(Program { statements })
}
