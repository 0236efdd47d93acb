/// Binary operator evaluation logic.
///
/// Handles arithmetic, equality and ordering, and the short-circuit `and`/`or`
/// chains.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements negation, logical `not`, and the `atoi`/`itoa` conversions.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the runtime context, statement execution with explicit return
/// propagation, and the expression dispatcher.
pub mod core;

/// Utility functions for evaluation.
///
/// Scope stack handling, variable lookup and assignment, and array element
/// access.
pub mod utils;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, function definitions,
/// argument checking, and return value computation.
pub mod function;

/// External script calls.
///
/// Resolves script paths and delegates execution to the host's runner.
pub mod script;
