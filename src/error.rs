/// Lexing errors.
///
/// Diagnostics for characters the lexer could not recognize. They are
/// collected rather than raised, so tokenizing never stops early.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree:
/// unexpected tokens and input that ends in the middle of a construct.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during execution: unknown
/// names, bad indexing, type mismatches, arithmetic failures, failed external
/// scripts and errors wrapped while unwinding out of a function call.
pub mod runtime_error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::{ErrorKind, RuntimeError};
