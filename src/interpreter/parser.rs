/// Core parsing entry points.
///
/// Contains the program-level entry point, the two expression entry levels
/// (`condition` and `expression`) and the shared `ParseResult` alias.
pub mod core;

/// Statement parsing.
///
/// Assignments, `if`/`while`, function definitions, calls used as statements,
/// and `return`.
pub mod statement;

/// Block parsing.
///
/// Statement sequences that end at `end` or `else`.
pub mod block;

/// Binary operator parsing.
///
/// The `or` and `and` chains (flattened into n-ary nodes), relational
/// operators, and the additive and multiplicative levels.
pub mod binary;

/// Unary and primary parsing.
///
/// `not`, negation, `itoa`/`atoi` casts, literals, identifiers, element reads,
/// calls, array literals and parenthesized conditions.
pub mod unary;

/// Utility functions for the parser.
pub mod utils;
