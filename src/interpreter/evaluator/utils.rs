use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    ast::{AssignTarget, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
    util::num::checked_index,
};

impl Context {
    /// Pushes `frame` onto the scope stack, runs `body`, and pops the frame
    /// again whether or not `body` succeeded.
    pub(crate) fn with_scope<T>(&mut self,
                                frame: HashMap<String, Value>,
                                body: impl FnOnce(&mut Self) -> T)
                                -> T {
        self.scope_stack.push(frame);
        let result = body(self);
        self.pop_scope();
        result
    }

    /// Pops the innermost scope. The global frame is never removed.
    pub(crate) fn pop_scope(&mut self) {
        if self.scope_stack.len() > 1 {
            self.scope_stack.pop();
        }
    }

    /// Looks up a variable, searching every frame from the innermost out to
    /// the globals.
    ///
    /// A called function therefore sees the variables of every caller that is
    /// still on the stack, not only its own parameters and the globals.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    ///
    /// use quill::{
    ///     config::Settings,
    ///     interpreter::{evaluator::core::Context, host::Host, value::core::Value},
    /// };
    ///
    /// let settings = Settings::default();
    /// let mut ctx = Context::new(settings.clone(), Host::stdio(&settings));
    /// ctx.set_variable("x", Value::Integer(1));
    /// ctx.scope_stack.push(HashMap::from([("y".to_string(), Value::Integer(2))]));
    /// ctx.scope_stack.push(HashMap::new());
    ///
    /// assert_eq!(ctx.get_variable("x"), Some(&Value::Integer(1)));
    /// assert_eq!(ctx.get_variable("y"), Some(&Value::Integer(2)));
    /// assert_eq!(ctx.get_variable("z"), None);
    /// ```
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.scope_stack
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
    }

    /// Binds `name` to `value`.
    ///
    /// The innermost frame that already binds `name` is updated. If no frame
    /// does, the variable is created in the global frame, even when called
    /// from inside a function.
    pub fn set_variable(&mut self, name: &str, value: Value) {
        let index = self.scope_stack
                        .iter()
                        .rposition(|frame| frame.contains_key(name))
                        .unwrap_or(0);
        if let Some(frame) = self.scope_stack.get_mut(index) {
            frame.insert(name.to_string(), value);
        }
    }

    /// Evaluates a variable reference.
    ///
    /// # Errors
    /// `UnknownVariable` if no frame binds `name`.
    pub(crate) fn eval_variable(&self, name: &str, line: usize) -> EvalResult<Value> {
        self.get_variable(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string(),
                                                           line })
    }

    /// Evaluates `name[index]`.
    ///
    /// The index is evaluated first and must be an integer; then the variable
    /// is looked up and must hold an array long enough to contain the index.
    ///
    /// # Errors
    /// - `InvalidIndex` for a non-integer index.
    /// - `UnknownVariable` or `NotAnArray` for a bad target.
    /// - `IndexOutOfBounds` for a negative or too large index.
    pub(crate) fn eval_array_item(&mut self,
                                  name: &str,
                                  index: &Expr,
                                  line: usize)
                                  -> EvalResult<Value> {
        let index = self.eval(index)?.as_index(line)?;
        let array = self.array_variable(name, line)?;
        let elements = array.borrow();
        let position = checked_index(index, elements.len()).ok_or_else(|| {
                           RuntimeError::IndexOutOfBounds { name: name.to_string(),
                                                            index,
                                                            len: elements.len(),
                                                            line }
                       })?;
        Ok(elements[position].clone())
    }

    /// Assigns `value` to a variable or an array element.
    ///
    /// Element assignment requires the array to exist already. It writes into
    /// the array's shared storage, so every name holding that array sees the
    /// new element.
    pub(crate) fn assign(&mut self,
                         target: &AssignTarget,
                         value: Value,
                         line: usize)
                         -> EvalResult<()> {
        match target {
            AssignTarget::Variable(name) => {
                self.set_variable(name, value);
                Ok(())
            },
            AssignTarget::Element { name, index } => {
                let index = self.eval(index)?.as_index(line)?;
                let array = self.array_variable(name, line)?;
                let mut elements = array.borrow_mut();
                let len = elements.len();
                let position = checked_index(index, len).ok_or_else(|| {
                                   RuntimeError::IndexOutOfBounds { name: name.to_string(),
                                                                    index,
                                                                    len,
                                                                    line }
                               })?;
                elements[position] = value;
                Ok(())
            },
        }
    }

    /// Returns the array held by `name`.
    fn array_variable(&self, name: &str, line: usize) -> EvalResult<Rc<RefCell<Vec<Value>>>> {
        match self.get_variable(name) {
            Some(Value::Array(elements)) => Ok(Rc::clone(elements)),
            Some(other) => Err(RuntimeError::NotAnArray { name: name.to_string(),
                                                          found: other.type_name(),
                                                          line }),
            None => Err(RuntimeError::UnknownVariable { name: name.to_string(),
                                                        line }),
        }
    }
}
