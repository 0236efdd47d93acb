use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a binary operation between two values.
    ///
    /// Arithmetic operators go to the arithmetic handlers, `==`/`!=` to
    /// structural equality, and the ordering operators to `eval_ordering`.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the evaluated result.
    ///
    /// # Example
    /// ```
    /// use quill::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let result = Context::eval_binary(BinaryOperator::Add,
    ///                                   &Value::Integer(3),
    ///                                   &Value::Integer(4),
    ///                                   1);
    /// assert_eq!(result.unwrap(), Value::Integer(7));
    ///
    /// let result = Context::eval_binary(BinaryOperator::Equal,
    ///                                   &Value::Integer(1),
    ///                                   &Value::Float(1.0),
    ///                                   1);
    /// assert_eq!(result.unwrap(), Value::Bool(true));
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Sub,
        };

        match op {
            Add => Self::eval_add(left, right, line),
            Sub => Self::eval_sub(left, right, line),
            Mul => Self::eval_mul(left, right, line),
            Div => Self::eval_div(left, right, line),
            Equal => Ok(Value::Bool(Self::values_equal(left, right))),
            NotEqual => Ok(Value::Bool(!Self::values_equal(left, right))),
            Less | LessEqual | Greater | GreaterEqual => {
                Self::eval_ordering(op, left, right, line).map(Value::Bool)
            },
        }
    }
}
