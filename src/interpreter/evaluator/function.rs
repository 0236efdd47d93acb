/// Built-in function implementations.
///
/// `print`, `input` and `len`. They take any number of arguments and cannot
/// be redefined.
pub mod builtin;

/// Function call dispatch and user-defined functions.
///
/// Looks names up in the built-in table before the user table, checks
/// definitions, binds parameters, and wraps errors escaping a function body.
pub mod core;
