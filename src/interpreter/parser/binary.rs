use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr, LogicalOperator},
    interpreter::{
        lexer::{Location, Token},
        parser::{
            core::ParseResult,
            unary::{parse_factor, parse_not},
        },
    },
};

/// Parses an `or` chain.
///
/// All operands of consecutive `or` operators end up in a single
/// [`Expr::Chain`]. A left operand that is already an `or` chain, for example
/// a parenthesized one, is extended rather than nested.
///
/// The rule is: `condition := boolexpression ("or" boolexpression)*`
///
/// # Parameters
/// - `tokens`: Token stream with location information.
///
/// # Returns
/// The single operand when no `or` follows it, otherwise a chain node.
pub fn parse_or_chain<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut left = parse_and_chain(tokens)?;
    while let Some((Token::Or, location)) = tokens.peek() {
        tokens.next();
        let right = parse_and_chain(tokens)?;
        left = extend_chain(left, LogicalOperator::Or, right, location.line);
    }
    Ok(left)
}

/// Parses an `and` chain, flattened the same way as [`parse_or_chain`].
///
/// The rule is: `boolexpression := boolterm ("and" boolterm)*`
pub fn parse_and_chain<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut left = parse_relational(tokens)?;
    while let Some((Token::And, location)) = tokens.peek() {
        tokens.next();
        let right = parse_relational(tokens)?;
        left = extend_chain(left, LogicalOperator::And, right, location.line);
    }
    Ok(left)
}

/// Parses relational comparisons.
///
/// Handles the left-associative operators `==`, `!=`, `<`, `<=`, `>`, `>=`.
/// Each application nests, so `a < b == c` compares the result of `a < b`
/// with `c`.
///
/// The rule is: `boolterm := boolfactor (relop boolfactor)*`
pub fn parse_relational<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut left = parse_not(tokens)?;
    loop {
        if let Some((token, location)) = tokens.peek()
           && let Some(op) = token_to_binary_operator(token)
           && op.is_relational()
        {
            tokens.next();
            let right = parse_not(tokens)?;
            left = Expr::BinaryOp { left: Box::new(left),
                                    op,
                                    right: Box::new(right),
                                    line: location.line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses addition and subtraction expressions.
///
/// Handles left-associative binary operators: `+` and `-`.
///
/// The rule is: `expression := term (("+" | "-") term)*`
///
/// # Parameters
/// - `tokens`: Token stream with location information.
///
/// # Returns
/// An `Expr::BinaryOp` tree representing the parsed expression.
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut left = parse_multiplicative(tokens)?;
    loop {
        if let Some((token, location)) = tokens.peek()
           && let Some(op) = token_to_binary_operator(token)
           && matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
        {
            tokens.next();
            let right = parse_multiplicative(tokens)?;
            left = Expr::BinaryOp { left: Box::new(left),
                                    op,
                                    right: Box::new(right),
                                    line: location.line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses multiplication-level expressions.
///
/// Handles the left-associative operators `*` and `/`.
///
/// The rule is: `term := factor (("*" | "/") factor)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut left = parse_factor(tokens)?;
    loop {
        if let Some((token, location)) = tokens.peek()
           && let Some(op) = token_to_binary_operator(token)
           && matches!(op, BinaryOperator::Mul | BinaryOperator::Div)
        {
            tokens.next();
            let right = parse_factor(tokens)?;
            left = Expr::BinaryOp { left: Box::new(left),
                                    op,
                                    right: Box::new(right),
                                    line: location.line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Appends `right` to `left` when `left` is already a chain of the same
/// connective, otherwise starts a new two-operand chain.
fn extend_chain(left: Expr, op: LogicalOperator, right: Expr, line: usize) -> Expr {
    match left {
        Expr::Chain { op: left_op,
                      mut operands,
                      line: chain_line, }
            if left_op == op =>
        {
            operands.push(right);
            Expr::Chain { op,
                          operands,
                          line: chain_line }
        },
        left => Expr::Chain { op,
                              operands: vec![left, right],
                              line },
    }
}

/// Maps a token to its binary operator, if it is one.
///
/// # Example
/// ```
/// use quill::{ast::BinaryOperator,
///             interpreter::{lexer::Token, parser::binary::token_to_binary_operator}};
///
/// assert_eq!(token_to_binary_operator(&Token::LessEqual),
///            Some(BinaryOperator::LessEqual));
/// assert_eq!(token_to_binary_operator(&Token::And), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::EqualEqual => Some(BinaryOperator::Equal),
        Token::BangEqual => Some(BinaryOperator::NotEqual),
        Token::Less => Some(BinaryOperator::Less),
        Token::LessEqual => Some(BinaryOperator::LessEqual),
        Token::Greater => Some(BinaryOperator::Greater),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        _ => None,
    }
}
