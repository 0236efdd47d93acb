/// Binary operator dispatch.
///
/// Routes each operator to the arithmetic or comparison handlers.
pub mod core;

/// Arithmetic operators: `+`, `-`, `*`, `/`.
///
/// Integer arithmetic is checked; mixing an integer with a float produces a
/// float. `+` also concatenates strings and arrays, and `*` repeats them.
pub mod arithmetic;

/// Equality and ordering.
///
/// Equality is defined for any pair of values; ordering only for two numbers,
/// two strings or two arrays.
pub mod comparison;

/// Short-circuit evaluation of `and`/`or` chains.
pub mod logic;
