/// Numeric conversion helpers.
///
/// Conversions between `i64`, `usize` and `f64` used by indexing, lengths and
/// mixed integer/float arithmetic. Fallible conversions return an `Option` or
/// a `RuntimeError` instead of truncating silently.
pub mod num;
