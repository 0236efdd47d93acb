/// The `Value` type and its conversions.
///
/// Defines the dynamically typed runtime value, truthiness, and the type
/// names used in error messages.
pub mod core;
/// Text rendering of values.
///
/// Implements `Display` for `Value` (the text produced by `itoa`, `print` and
/// script arguments) and the escape-sequence expansion applied when text is
/// written to the output stream.
pub mod format;
