use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::LiteralValue,
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
};

/// Represents a runtime value in the interpreter.
///
/// This enum models all the possible types that can appear in expressions,
/// assignments, function returns, and conditions. There is no static typing;
/// every operator checks the kinds of its operands when it runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A double precision floating-point number.
    Float(f64),
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// A string of text.
    Str(String),
    /// An ordered sequence of values.
    ///
    /// Arrays are shared by reference: assigning an array or passing it to a
    /// function hands out the same storage, so element writes made through
    /// one name are seen through every other.
    Array(Rc<RefCell<Vec<Self>>>),
    /// The absence of a value. Returned by functions that do not `return`
    /// anything and by `print`.
    Null,
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(Rc::new(RefCell::new(v)))
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Integer(n) => Self::Integer(*n),
            LiteralValue::Float(r) => Self::Float(*r),
            LiteralValue::Bool(b) => Self::Bool(*b),
            LiteralValue::Str(s) => Self::Str(s.clone()),
        }
    }
}

impl Value {
    /// Returns the truthiness of the value.
    ///
    /// `false`, `0`, `0.0`, the empty string, the empty array and null are
    /// falsy; everything else is truthy.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::value::core::Value;
    ///
    /// assert!(Value::from("0").is_truthy());
    /// assert!(!Value::from(0.0).is_truthy());
    /// assert!(!Value::from(Vec::new()).is_truthy());
    /// assert!(!Value::Null.is_truthy());
    /// ```
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Integer(n) => *n != 0,
            Self::Float(r) => *r != 0.0,
            Self::Bool(b) => *b,
            Self::Str(s) => !s.is_empty(),
            Self::Array(v) => !v.borrow().is_empty(),
            Self::Null => false,
        }
    }

    /// Returns the name of the value's type, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Null => "null",
        }
    }

    /// Converts the value to an array index.
    ///
    /// # Parameters
    /// - `line`: Source code line number for error reporting.
    ///
    /// # Returns
    /// - `Ok(i64)`: The integer value.
    /// - `Err(RuntimeError::InvalidIndex)`: If the value is not an integer.
    pub const fn as_index(&self, line: usize) -> EvalResult<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            _ => Err(RuntimeError::InvalidIndex { found: self.type_name(),
                                                  line }),
        }
    }

    /// Returns the length of a string (in characters) or an array.
    ///
    /// # Returns
    /// - `Some(usize)`: For strings and arrays.
    /// - `None`: For every other kind of value.
    #[must_use]
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::Str(s) => Some(s.chars().count()),
            Self::Array(v) => Some(v.borrow().len()),
            _ => None,
        }
    }
}
