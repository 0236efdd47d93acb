use crate::{
    ast::{Expr, LogicalOperator},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a flattened `and`/`or` chain.
    ///
    /// Operands are evaluated left to right. An `and` chain stops at the first
    /// falsy operand and yields `false`; an `or` chain stops at the first
    /// truthy operand and yields `true`. Operands after the deciding one are
    /// never evaluated, so calls inside them do not run.
    ///
    /// # Parameters
    /// - `op`: The connective.
    /// - `operands`: The chained operand expressions.
    ///
    /// # Returns
    /// A `Value::Bool`.
    pub fn eval_chain(&mut self, op: LogicalOperator, operands: &[Expr]) -> EvalResult<Value> {
        let short_circuit_on = matches!(op, LogicalOperator::Or);
        for operand in operands {
            if self.eval(operand)?.is_truthy() == short_circuit_on {
                return Ok(Value::Bool(short_circuit_on));
            }
        }
        Ok(Value::Bool(!short_circuit_on))
    }
}
