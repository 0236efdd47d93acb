use std::io::{BufRead, Write};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{core::Value, format::expand_escapes},
    },
    util::num::usize_to_i64_checked,
};

/// Writes every argument to the output, with escape sequences expanded and
/// no separator or trailing newline, then flushes.
///
/// # Returns
/// `Value::Null`.
pub fn print(ctx: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    write_all(ctx, args, line)?;
    Ok(Value::Null)
}

/// Prints its arguments like [`print`], then reads one line of input.
///
/// The line terminator is removed from the result.
///
/// # Errors
/// `Io` if reading fails or the input is already exhausted.
pub fn input(ctx: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    write_all(ctx, args, line)?;

    let mut text = String::new();
    let read = ctx.host
                  .input
                  .read_line(&mut text)
                  .map_err(|e| io_error(&e, line))?;
    if read == 0 {
        return Err(RuntimeError::Io { details: "unexpected end of input".to_string(),
                                      line });
    }
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(Value::Str(text))
}

/// Returns an array with the length of each argument: the number of
/// characters of a string, the number of elements of an array, and null for
/// anything else.
///
/// # Example
/// ```
/// use quill::{
///     config::Settings,
///     interpreter::{
///         evaluator::{core::Context, function::builtin::len},
///         host::Host,
///         value::core::Value,
///     },
/// };
///
/// let settings = Settings::default();
/// let mut ctx = Context::new(settings.clone(), Host::stdio(&settings));
/// let lengths = len(&mut ctx, &[Value::from("héllo"), Value::Integer(3)], 1).unwrap();
///
/// assert_eq!(lengths, Value::from(vec![Value::Integer(5), Value::Null]));
/// ```
pub fn len(_ctx: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    let lengths = args.iter()
                      .map(|arg| match arg.length() {
                          Some(n) => usize_to_i64_checked(n, line).map(Value::Integer),
                          None => Ok(Value::Null),
                      })
                      .collect::<EvalResult<Vec<_>>>()?;
    Ok(Value::from(lengths))
}

fn write_all(ctx: &mut Context, args: &[Value], line: usize) -> EvalResult<()> {
    let text: String = args.iter()
                           .map(|arg| expand_escapes(&arg.to_string()))
                           .collect();
    ctx.host
       .output
       .write_all(text.as_bytes())
       .and_then(|()| ctx.host.output.flush())
       .map_err(|e| io_error(&e, line))
}

fn io_error(error: &std::io::Error, line: usize) -> RuntimeError {
    RuntimeError::Io { details: error.to_string(),
                       line }
}
