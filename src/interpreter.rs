/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, executes statements and evaluates
/// expressions, manages the scope stack and the function table, and talks to
/// the outside world through a [`host::Host`]. It is the core execution engine
/// of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles variables, functions, and control flow.
/// - Reports runtime errors such as division by zero or invalid operations.
pub mod evaluator;
/// Host capabilities available to a running program.
///
/// Output and input streams for `print` and `input`, and the runner that
/// executes external scripts. Everything here can be replaced, which is how
/// the tests run programs without touching the real terminal or spawning
/// processes.
pub mod host;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// strings, identifiers, keywords, operators and script references. This is
/// the first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source locations.
/// - Skips whitespace and `#` comments and counts lines.
/// - Reports unrecognized characters without stopping.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of statements and
/// expressions.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Flattens `and`/`or` chains into single n-ary nodes.
/// - Reports the first syntax error with its location; there is no recovery.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the dynamically typed values used during
/// interpretation (integers, floats, booleans, strings, arrays and null), and
/// how they are rendered as text.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Implements truthiness and type names.
/// - Formats values for `print`, `itoa` and external script arguments.
pub mod value;
