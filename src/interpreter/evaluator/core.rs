use std::{collections::HashMap, rc::Rc};

use log::{debug, trace};

use crate::{
    ast::{Expr, Program, Statement},
    config::Settings,
    error::RuntimeError,
    interpreter::{host::Host, value::core::Value},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// How a statement finished.
///
/// `return` unwinds through every enclosing statement sequence, loop and
/// branch until it reaches the function call (or the top of the program).
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Execution continues with the next statement.
    Normal,
    /// A `return` is propagating with this value.
    Return(Value),
}

/// A user-defined function as stored in the function table.
#[derive(Debug, Clone)]
pub struct Function {
    /// Parameter names, in declaration order.
    pub params: Vec<String>,
    /// The body, shared between the table and any calls in progress.
    pub body:   Rc<Program>,
}

/// Stores the runtime state of one program run.
///
/// `Context` owns the scope stack, the function table and the [`Host`] the
/// program talks to. Nothing is shared between contexts, so independent runs
/// never observe each other.
pub struct Context {
    /// Variable frames. Frame 0 holds globals and is never popped; every user
    /// function call pushes one frame for its parameters.
    pub scope_stack:  Vec<HashMap<String, Value>>,
    /// User-defined functions by name. Entries are never removed.
    pub functions:    HashMap<String, Function>,
    pub(crate) host:  Host,
    pub(crate) settings: Settings,
    pub(crate) depth: usize,
}

impl Context {
    /// Creates a new evaluation context with a single empty global frame and
    /// no user-defined functions.
    #[must_use]
    pub fn new(settings: Settings, host: Host) -> Self {
        Self { scope_stack: vec![HashMap::new()],
               functions: HashMap::new(),
               host,
               settings,
               depth: 0 }
    }

    /// Runs a whole program.
    ///
    /// A `return` at the top level stops the program early; its value is
    /// discarded.
    ///
    /// # Errors
    /// Returns the first `RuntimeError` raised; execution stops there.
    pub fn run(&mut self, program: &Program) -> EvalResult<()> {
        debug!("running program with {} top-level statement(s)",
               program.statements.len());
        if let Flow::Return(value) = self.exec_program(program)? {
            debug!("program returned {value} at top level");
        }
        Ok(())
    }

    /// Executes a statement sequence.
    ///
    /// Statements run in order until one of them returns; the return is then
    /// passed up without running the rest.
    ///
    /// # Example
    /// ```
    /// use quill::{
    ///     config::Settings,
    ///     interpreter::{
    ///         evaluator::core::{Context, Flow},
    ///         host::Host,
    ///         value::core::Value,
    ///     },
    /// };
    ///
    /// let program = quill::parse("x = 2 return x * 3 x = 100").unwrap();
    /// let settings = Settings::default();
    /// let mut ctx = Context::new(settings.clone(), Host::stdio(&settings));
    ///
    /// let flow = ctx.exec_program(&program).unwrap();
    /// assert_eq!(flow, Flow::Return(Value::Integer(6)));
    /// assert_eq!(ctx.get_variable("x"), Some(&Value::Integer(2)));
    /// ```
    pub fn exec_program(&mut self, program: &Program) -> EvalResult<Flow> {
        for statement in &program.statements {
            if let Flow::Return(value) = self.exec_statement(statement)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a single statement.
    ///
    /// Assignments and definitions change the context; calls run for their
    /// side effects and their values are discarded; `if` and `while` pass on a
    /// return produced by their bodies.
    ///
    /// # Parameters
    /// - `statement`: Statement to execute.
    ///
    /// # Returns
    /// [`Flow::Return`] if a `return` was executed, otherwise
    /// [`Flow::Normal`].
    pub fn exec_statement(&mut self, statement: &Statement) -> EvalResult<Flow> {
        trace!("executing statement on line {}", statement.line_number());
        match statement {
            Statement::Assign { target, value, line } => {
                let value = self.eval(value)?;
                self.assign(target, value, *line)?;
                Ok(Flow::Normal)
            },
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                if self.eval(condition)?.is_truthy() {
                    self.exec_program(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_program(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            },
            Statement::While { condition, body, .. } => {
                while self.eval(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.exec_program(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            },
            Statement::FunctionDef(def) => {
                self.define_function(def)?;
                Ok(Flow::Normal)
            },
            Statement::Call(call) => {
                self.eval_function_call(call)?;
                Ok(Flow::Normal)
            },
            Statement::ScriptCall(call) => {
                self.eval_script_call(call)?;
                Ok(Flow::Normal)
            },
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            },
        }
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. Every
    /// expression produces a value; calls to functions that return nothing
    /// produce [`Value::Null`].
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    ///
    /// # Returns
    /// The computed value.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Variable { name, line } => self.eval_variable(name, *line),
            Expr::ArrayItem { name, index, line } => self.eval_array_item(name, index, *line),
            Expr::ArrayLiteral { elements, .. } => Ok(Value::from(self.eval_all(elements)?)),
            Expr::UnaryOp { op, expr, line } => {
                let operand = self.eval(expr)?;
                Self::eval_unary(*op, &operand, *line)
            },
            Expr::BinaryOp { left,
                             op,
                             right,
                             line, } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Self::eval_binary(*op, &left, &right, *line)
            },
            Expr::Chain { op, operands, .. } => self.eval_chain(*op, operands),
            Expr::FunctionCall(call) => self.eval_function_call(call),
            Expr::ScriptCall(call) => self.eval_script_call(call),
        }
    }

    /// Evaluates expressions left to right and collects the values.
    pub(crate) fn eval_all(&mut self, exprs: &[Expr]) -> EvalResult<Vec<Value>> {
        exprs.iter().map(|expr| self.eval(expr)).collect()
    }
}
