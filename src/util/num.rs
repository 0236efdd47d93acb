use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Converts an `i64` to the nearest `f64`.
///
/// Used when an integer meets a float in arithmetic or comparison. Integers
/// beyond `2^53` round to the nearest representable float.
///
/// ## Example
/// ```
/// use quill::util::num::i64_to_f64;
///
/// assert_eq!(i64_to_f64(42), 42.0);
/// assert_eq!(i64_to_f64(-3), -3.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Converts an array index to a position in a sequence of length `len`.
///
/// ## Returns
/// - `Some(usize)`: If `0 <= index < len`.
/// - `None`: If the index is negative or past the end.
///
/// ## Example
/// ```
/// use quill::util::num::checked_index;
///
/// assert_eq!(checked_index(2, 3), Some(2));
/// assert_eq!(checked_index(3, 3), None);
/// assert_eq!(checked_index(-1, 3), None);
/// ```
#[must_use]
pub fn checked_index(index: i64, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < len)
}

/// Converts a length to an `i64` language integer.
///
/// ## Errors
/// Returns `RuntimeError::Overflow` if the length does not fit.
pub fn usize_to_i64_checked(value: usize, line: usize) -> EvalResult<i64> {
    i64::try_from(value).map_err(|_| RuntimeError::Overflow { line })
}

/// Computes the length of `count` repetitions of a sequence of length `len`.
///
/// Negative counts repeat zero times.
///
/// ## Returns
/// - `Ok((times, total))`: the repetition count and resulting length.
///
/// ## Errors
/// Returns `RuntimeError::Overflow` if the total length cannot be addressed.
///
/// ## Example
/// ```
/// use quill::util::num::repetition;
///
/// assert_eq!(repetition(3, 2, 1).unwrap(), (3, 6));
/// assert_eq!(repetition(-4, 2, 1).unwrap(), (0, 0));
/// assert!(repetition(i64::MAX, usize::MAX, 1).is_err());
/// ```
pub fn repetition(count: i64, len: usize, line: usize) -> EvalResult<(usize, usize)> {
    let times = usize::try_from(count.max(0)).map_err(|_| RuntimeError::Overflow { line })?;
    let total = times.checked_mul(len)
                     .filter(|&total| isize::try_from(total).is_ok())
                     .ok_or(RuntimeError::Overflow { line })?;
    Ok((times, total))
}
