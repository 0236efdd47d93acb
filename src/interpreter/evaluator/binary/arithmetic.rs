use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
    util::num::{i64_to_f64, repetition},
};

impl Context {
    /// Evaluates `left + right`.
    ///
    /// Numbers add (integer overflow is an error, an integer and a float give
    /// a float); two strings or two arrays concatenate.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let joined = Context::eval_add(&Value::from("ab"), &Value::from("cd"), 1).unwrap();
    /// assert_eq!(joined, Value::from("abcd"));
    ///
    /// assert!(Context::eval_add(&Value::from("1"), &Value::Integer(1), 1).is_err());
    /// ```
    pub fn eval_add(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        match (left, right) {
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
            (Value::Array(a), Value::Array(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                Ok(Value::from(a.iter().chain(b.iter()).cloned().collect::<Vec<_>>()))
            },
            _ => Self::eval_numeric(BinaryOperator::Add, left, right, line),
        }
    }

    /// Evaluates `left - right`. Only numbers can be subtracted.
    pub fn eval_sub(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        Self::eval_numeric(BinaryOperator::Sub, left, right, line)
    }

    /// Evaluates `left * right`.
    ///
    /// Numbers multiply. An integer times a string or an array repeats it;
    /// a negative count yields an empty result. Any other pairing is a type
    /// error.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let v = Context::eval_mul(&Value::Integer(2), &Value::Float(3.0), 1).unwrap();
    /// assert_eq!(v, Value::Float(6.0));
    ///
    /// let v = Context::eval_mul(&Value::from("ab"), &Value::Integer(3), 1).unwrap();
    /// assert_eq!(v, Value::from("ababab"));
    /// ```
    pub fn eval_mul(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        match (left, right) {
            (Value::Integer(n), Value::Str(s)) | (Value::Str(s), Value::Integer(n)) => {
                let (times, _) = repetition(*n, s.len(), line)?;
                Ok(Value::Str(s.repeat(times)))
            },
            (Value::Integer(n), Value::Array(elements))
            | (Value::Array(elements), Value::Integer(n)) => {
                let elements = elements.borrow();
                let (_, total) = repetition(*n, elements.len(), line)?;
                Ok(Value::from(elements.iter().cycle().take(total).cloned().collect::<Vec<_>>()))
            },
            _ => Self::eval_numeric(BinaryOperator::Mul, left, right, line),
        }
    }

    /// Evaluates `left / right`.
    ///
    /// Both operands must be numbers and the divisor non-zero. The quotient
    /// is always a float, even for two integers that divide evenly.
    ///
    /// # Example
    /// ```
    /// use quill::{
    ///     error::RuntimeError,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::eval_div(&Value::Integer(6), &Value::Integer(3), 1).unwrap();
    /// assert_eq!(v, Value::Float(2.0));
    ///
    /// let err = Context::eval_div(&Value::Integer(1), &Value::Integer(0), 4).unwrap_err();
    /// assert!(matches!(err, RuntimeError::DivisionByZero { line: 4 }));
    /// ```
    pub fn eval_div(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        let (Some(a), Some(b)) = (as_float(left), as_float(right)) else {
            return Err(mismatch(BinaryOperator::Div, left, right, line));
        };
        if b == 0.0 {
            return Err(RuntimeError::DivisionByZero { line });
        }
        Ok(Value::Float(a / b))
    }

    /// Applies `+`, `-` or `*` to two numbers.
    fn eval_numeric(op: BinaryOperator,
                    left: &Value,
                    right: &Value,
                    line: usize)
                    -> EvalResult<Value> {
        if let (Value::Integer(a), Value::Integer(b)) = (left, right) {
            let result = match op {
                BinaryOperator::Add => a.checked_add(*b),
                BinaryOperator::Sub => a.checked_sub(*b),
                _ => a.checked_mul(*b),
            };
            return result.map(Value::Integer)
                         .ok_or(RuntimeError::Overflow { line });
        }

        let (Some(a), Some(b)) = (as_float(left), as_float(right)) else {
            return Err(mismatch(op, left, right, line));
        };
        let result = match op {
            BinaryOperator::Add => a + b,
            BinaryOperator::Sub => a - b,
            _ => a * b,
        };
        Ok(Value::Float(result))
    }
}

/// Returns the numeric value of an integer or float.
fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(n) => Some(i64_to_f64(*n)),
        Value::Float(r) => Some(*r),
        _ => None,
    }
}

fn mismatch(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> RuntimeError {
    RuntimeError::TypeError { details: format!("unsupported operand types for {op}: {} and {}",
                                               left.type_name(),
                                               right.type_name()),
                              line }
}
