use std::{
    collections::{HashMap, HashSet},
    rc::Rc,
};

use log::{debug, trace};

use crate::{
    ast::{Call, Expr, FunctionDef},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow, Function},
            function::builtin,
        },
        value::core::Value,
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the context (for access to the host streams), the
/// evaluated arguments and the line number of the call.
type BuiltinFn = fn(&mut Context, &[Value], usize) -> EvalResult<Value>;

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides a string name and a function pointer implementing the
/// builtin. Builtins accept any number of arguments.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => $func:expr
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name: &'static str,
            func: BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, func: $func },
            )*
        ];
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "print" => builtin::print,
    "input" => builtin::input,
    "len"   => builtin::len,
}

impl Context {
    /// Evaluates a function call.
    ///
    /// Builtins are checked first. For a user-defined function the name is
    /// resolved before any argument is evaluated, so calling an unknown
    /// function never runs its argument expressions.
    ///
    /// # Parameters
    /// - `call`: The call node.
    ///
    /// # Returns
    /// The function result; `Value::Null` if a user function ends without
    /// `return`.
    pub fn eval_function_call(&mut self, call: &Call) -> EvalResult<Value> {
        if let Some(builtin) = BUILTIN_TABLE.iter().find(|b| b.name == call.name) {
            let args = self.eval_all(&call.arguments)?;
            return (builtin.func)(self, &args, call.line);
        }

        let function =
            self.functions
                .get(&call.name)
                .cloned()
                .ok_or_else(|| RuntimeError::UnknownFunction { name: call.name.clone(),
                                                               line: call.line, })?;
        let args = self.eval_all(&call.arguments)?;
        self.call_user_defined_function(&call.name, &function, args, call.line)
    }

    /// Executes a user-defined function.
    ///
    /// A new frame binding the parameters to the arguments is pushed for the
    /// duration of the body and popped afterwards, also when the body fails.
    /// Errors from the body come back wrapped in
    /// [`RuntimeError::FunctionFailed`].
    ///
    /// # Errors
    /// - `ArgumentCountMismatch` for the wrong number of arguments.
    /// - `RecursionLimit` when nesting exceeds the configured depth.
    /// - `FunctionFailed` for anything raised by the body.
    fn call_user_defined_function(&mut self,
                                  name: &str,
                                  function: &Function,
                                  args: Vec<Value>,
                                  line: usize)
                                  -> EvalResult<Value> {
        if args.len() != function.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                             expected: function.params.len(),
                                                             found: args.len(),
                                                             line });
        }
        if self.depth >= self.settings.max_call_depth {
            return Err(RuntimeError::RecursionLimit { name: name.to_string(),
                                                      limit: self.settings.max_call_depth,
                                                      line });
        }

        let frame = function.params
                            .iter()
                            .cloned()
                            .zip(args)
                            .collect::<HashMap<_, _>>();

        trace!("calling '{name}' at depth {}", self.depth + 1);
        self.depth += 1;
        let result = self.with_scope(frame, |ctx| ctx.exec_program(&function.body));
        self.depth -= 1;

        match result {
            Ok(Flow::Return(value)) => Ok(value),
            Ok(Flow::Normal) => Ok(Value::Null),
            Err(source) => Err(RuntimeError::FunctionFailed { name: name.to_string(),
                                                              line,
                                                              source: Box::new(source) }),
        }
    }

    /// Registers a user-defined function.
    ///
    /// Defining a function under an existing user function's name replaces
    /// it.
    ///
    /// # Errors
    /// - `BuiltinFunctionRedefinition` for `print`, `input` or `len`.
    /// - `InvalidParameter` if a parameter is not a plain identifier.
    /// - `DuplicateParameter` if a name appears twice in the list.
    pub fn define_function(&mut self, def: &FunctionDef) -> EvalResult<()> {
        if is_builtin(&def.name) {
            return Err(RuntimeError::BuiltinFunctionRedefinition { name: def.name.clone(),
                                                                   line: def.line, });
        }

        let mut seen = HashSet::new();
        let mut params = Vec::with_capacity(def.params.len());
        for param in &def.params {
            let Expr::Variable { name, .. } = param else {
                return Err(RuntimeError::InvalidParameter { function: def.name.clone(),
                                                            found:    param.kind(),
                                                            line:     def.line, });
            };
            if !seen.insert(name.as_str()) {
                return Err(RuntimeError::DuplicateParameter { function: def.name.clone(),
                                                              name:     name.clone(),
                                                              line:     def.line, });
            }
            params.push(name.clone());
        }

        debug!("defining function '{}' with {} parameter(s)",
               def.name,
               params.len());
        self.functions.insert(def.name.clone(),
                              Function { params,
                                         body: Rc::new(def.body.clone()) });
        Ok(())
    }
}

/// Returns `true` if `name` is a builtin function.
///
/// # Example
/// ```
/// use quill::interpreter::evaluator::function::core::is_builtin;
///
/// assert!(is_builtin("print"));
/// assert!(!is_builtin("square"));
/// ```
#[must_use]
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&name)
}
