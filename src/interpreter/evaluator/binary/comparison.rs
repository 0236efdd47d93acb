use std::{cmp::Ordering, rc::Rc};

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
    util::num::i64_to_f64,
};

impl Context {
    /// Structural equality used by `==` and `!=`.
    ///
    /// Integers and floats compare by numeric value. Arrays are equal when
    /// they are the same array or have the same length and pairwise equal
    /// elements. Values of
    /// different kinds are never equal, so `1 == true` and `"1" == 1` are
    /// both false.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let a = Value::from(vec![Value::Integer(1), Value::from("x")]);
    /// let b = Value::from(vec![Value::Float(1.0), Value::from("x")]);
    ///
    /// assert!(Context::values_equal(&a, &b));
    /// assert!(!Context::values_equal(&Value::Integer(1), &Value::Bool(true)));
    /// ```
    #[must_use]
    pub fn values_equal(left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                i64_to_f64(*a) == *b
            },
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| Self::values_equal(x, y))
            },
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }

    /// Evaluates `<`, `<=`, `>` or `>=`.
    ///
    /// Numbers compare numerically, strings lexicographically by character,
    /// and arrays element by element: the first unequal pair decides, and if
    /// one array is a prefix of the other the shorter one is smaller.
    /// Comparisons involving NaN are false.
    ///
    /// # Errors
    /// `TypeError` if the operands are not two numbers, two strings or two
    /// arrays, including arrays whose deciding elements cannot be ordered.
    ///
    /// # Example
    /// ```
    /// use quill::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let a = Value::from(vec![Value::Integer(1), Value::Integer(2)]);
    /// let b = Value::from(vec![Value::Integer(1), Value::Integer(3)]);
    ///
    /// assert!(Context::eval_ordering(BinaryOperator::Less, &a, &b, 1).unwrap());
    /// assert!(Context::eval_ordering(BinaryOperator::Less, &Value::from("a"), &Value::Integer(1), 1).is_err());
    /// ```
    pub fn eval_ordering(op: BinaryOperator,
                         left: &Value,
                         right: &Value,
                         line: usize)
                         -> EvalResult<bool> {
        let ordering = compare(left, right).ok_or_else(|| {
            RuntimeError::TypeError { details: format!("'{op}' is not supported between {} and {}",
                                                       left.type_name(),
                                                       right.type_name()),
                                      line }
        })?;

        Ok(ordering.is_some_and(|ordering| match op {
                                    BinaryOperator::Less => ordering.is_lt(),
                                    BinaryOperator::LessEqual => ordering.is_le(),
                                    BinaryOperator::Greater => ordering.is_gt(),
                                    _ => ordering.is_ge(),
                                }))
    }
}

/// Orders two values.
///
/// The outer `None` means the kinds cannot be ordered at all; the inner
/// `None` means they can, but the result is undefined (NaN).
#[allow(clippy::option_option)]
fn compare(left: &Value, right: &Value) -> Option<Option<Ordering>> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(Some(a.cmp(b))),
        (Value::Integer(a), Value::Float(b)) => Some(i64_to_f64(*a).partial_cmp(b)),
        (Value::Float(a), Value::Integer(b)) => Some(a.partial_cmp(&i64_to_f64(*b))),
        (Value::Float(a), Value::Float(b)) => Some(a.partial_cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(Some(a.cmp(b))),
        (Value::Array(a), Value::Array(b)) => {
            let (a, b) = (a.borrow(), b.borrow());
            match a.iter()
                   .zip(b.iter())
                   .find(|(x, y)| !Context::values_equal(x, y))
            {
                Some((x, y)) => compare(x, y),
                None => Some(Some(a.len().cmp(&b.len()))),
            }
        },
        _ => None,
    }
}
