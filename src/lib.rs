//! # quill
//!
//! quill is an interpreter for a small imperative scripting language written
//! in Rust. Programs are built from `begin`/`end` blocks, dynamically typed
//! values, user-defined functions, arrays, and calls out to external scripts.
//!
//! The pipeline is [`tokenize`] → [`parse`] → [`run`]; [`execute`] does all
//! three with an explicit [`config::Settings`] and [`interpreter::host::Host`].

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use log::{debug, warn};

pub use crate::interpreter::lexer::{Tokens, tokenize};
use crate::{
    ast::Program,
    config::Settings,
    error::{ParseError, RuntimeError},
    interpreter::{
        evaluator::core::Context,
        host::Host,
        lexer::{Location, Token},
        parser::core::parse_program,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Statement` and `Expr` enums and related types
/// that represent the syntactic structure of source code as a tree. The AST is
/// built by the parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines statement and expression types for all language constructs.
/// - Attaches source lines to AST nodes for error reporting.
/// - Renders the tree for debugging.
pub mod ast;
/// Settings for a program run.
///
/// External script interpreter and timeout, working directory for script
/// paths, and the call depth limit.
pub mod config;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// This module defines all errors that can be raised while processing code. It
/// standardizes error reporting and carries detailed information about
/// failures, including error kinds, descriptions, and source lines.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations and host capabilities to provide a complete runtime for
/// programs.
pub mod interpreter;
/// General utilities for safe numeric conversion.
pub mod util;

/// Parses source text into a [`Program`].
///
/// Lexical diagnostics do not stop parsing: unrecognized characters are
/// logged at warn level and skipped, and the remaining tokens are parsed.
/// Use [`tokenize`] to inspect the diagnostics directly.
///
/// # Errors
/// Returns the first `ParseError` encountered.
///
/// # Examples
/// ```
/// let program = quill::parse("x = 1\nprint(x)").unwrap();
/// assert_eq!(program.statements.len(), 2);
///
/// assert!(quill::parse("if x begin print(x)").is_err());
/// ```
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let lexed = tokenize(source);
    for error in &lexed.errors {
        warn!("{error}");
    }
    parse_tokens(&lexed.tokens)
}

/// Parses an already tokenized program.
///
/// # Errors
/// Returns the first `ParseError` encountered.
pub fn parse_tokens(tokens: &[(Token, Location)]) -> Result<Program, ParseError> {
    let mut iter = tokens.iter().peekable();
    let program = parse_program(&mut iter)?;
    debug!("parsed {} top-level statement(s)", program.statements.len());
    Ok(program)
}

/// Runs a program against the process's standard streams with default
/// settings.
///
/// # Errors
/// Returns the `RuntimeError` that stopped the program.
pub fn run(program: &Program) -> Result<(), RuntimeError> {
    let settings = Settings::default();
    let host = Host::stdio(&settings);
    run_with(program, settings, host)
}

/// Runs a program with explicit settings and host.
///
/// Every call starts from an empty scope stack and function table.
///
/// # Errors
/// Returns the `RuntimeError` that stopped the program.
pub fn run_with(program: &Program, settings: Settings, host: Host) -> Result<(), RuntimeError> {
    Context::new(settings, host).run(program)
}

/// Parses and runs source text.
///
/// # Errors
/// Returns an error if parsing fails or the program raises a runtime error.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use quill::{
///     config::Settings,
///     interpreter::host::{CapturedOutput, Host, PythonRunner},
/// };
///
/// let output = CapturedOutput::default();
/// let settings = Settings::default();
/// let host = Host::new(Box::new(output.clone()),
///                      Box::new(Cursor::new(Vec::new())),
///                      Box::new(PythonRunner::from_settings(&settings)));
///
/// let source = "x = 1\nwhile x <= 3 begin\nprint(itoa(x))\nx = x + 1\nend";
/// quill::execute(source, settings, host).unwrap();
///
/// assert_eq!(output.contents(), "123");
/// ```
pub fn execute(source: &str, settings: Settings, host: Host) -> Result<(), Box<dyn std::error::Error>> {
    let program = parse(source)?;
    run_with(&program, settings, host)?;
    Ok(())
}
