use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: numeric negation of integers and floats.
    /// - `Not`: negation of the operand's truthiness; works on any value.
    /// - `Atoi`: parses a string as an integer, or failing that as a float.
    ///   Surrounding whitespace is ignored.
    /// - `Itoa`: renders any value as a string.
    ///
    /// # Parameters
    /// - `op`: Unary operator.
    /// - `value`: Input value.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The computed `Value` wrapped in `EvalResult`.
    ///
    /// # Example
    /// ```
    /// use quill::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::eval_unary(UnaryOperator::Negate, &Value::Integer(5), 1).unwrap();
    /// assert_eq!(v, Value::Integer(-5));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Not, &Value::from(""), 1).unwrap();
    /// assert_eq!(v, Value::Bool(true));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Atoi, &Value::from(" 2.5 "), 1).unwrap();
    /// assert_eq!(v, Value::Float(2.5));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Itoa, &Value::Float(6.0), 1).unwrap();
    /// assert_eq!(v, Value::from("6.0"));
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => match value {
                Value::Integer(n) => n.checked_neg()
                                      .map(Value::Integer)
                                      .ok_or(RuntimeError::Overflow { line }),
                Value::Float(r) => Ok(Value::Float(-r)),
                _ => Err(RuntimeError::TypeError { details: format!("cannot negate {}",
                                                                    value.type_name()),
                                                   line }),
            },
            UnaryOperator::Not => Ok(Value::Bool(!value.is_truthy())),
            UnaryOperator::Atoi => match value {
                Value::Str(text) => parse_number(text, line),
                _ => Err(RuntimeError::TypeError { details: format!("atoi expects a string, found {}",
                                                                    value.type_name()),
                                                   line }),
            },
            UnaryOperator::Itoa => Ok(Value::Str(value.to_string())),
        }
    }
}

/// Parses text as an integer, falling back to a float.
fn parse_number(text: &str, line: usize) -> EvalResult<Value> {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(Value::Integer(n));
    }
    trimmed.parse::<f64>()
           .map(Value::Float)
           .map_err(|_| RuntimeError::InvalidConversion { text: text.to_string(),
                                                          line })
}
