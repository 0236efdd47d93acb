use std::{
    cell::RefCell,
    fmt::{self, Display, Formatter},
    rc::Rc,
};

use crate::interpreter::value::core::Value;

impl Display for Value {
    /// Renders the value as text.
    ///
    /// Strings render as their contents. Booleans render as `True`/`False`
    /// and null as `None`. Floats always show a fractional part or an
    /// exponent (`6.0`, `1e+16`). Array elements render in quoted form, so
    /// `["a", 1]` shows as `['a', 1]`; an array that contains itself shows
    /// the inner occurrence as `[...]`.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::value::core::Value;
    ///
    /// let v = Value::from(vec![Value::Bool(true), Value::Null, Value::from("a")]);
    /// assert_eq!(v.to_string(), "[True, None, 'a']");
    /// ```
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut Vec::new())
    }
}

/// Writes `value`, tracking the arrays currently being written in `open` so
/// that a self-containing array terminates.
fn write_value(f: &mut Formatter<'_>,
               value: &Value,
               open: &mut Vec<*const RefCell<Vec<Value>>>)
               -> fmt::Result {
    match value {
        Value::Integer(n) => write!(f, "{n}"),
        Value::Float(r) => write!(f, "{}", format_float(*r)),
        Value::Bool(true) => write!(f, "True"),
        Value::Bool(false) => write!(f, "False"),
        Value::Str(s) => write!(f, "{s}"),
        Value::Null => write!(f, "None"),
        Value::Array(array) => {
            let id = Rc::as_ptr(array);
            if open.contains(&id) {
                return write!(f, "[...]");
            }
            open.push(id);
            write!(f, "[")?;
            for (i, element) in array.borrow().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                match element {
                    Value::Str(s) => write!(f, "{}", quote(s))?,
                    other => write_value(f, other, open)?,
                }
            }
            open.pop();
            write!(f, "]")
        },
    }
}

/// Formats a float the way the language prints it.
///
/// # Example
/// ```
/// use quill::interpreter::value::format::format_float;
///
/// assert_eq!(format_float(6.0), "6.0");
/// assert_eq!(format_float(0.1), "0.1");
/// assert_eq!(format_float(1e16), "1e+16");
/// assert_eq!(format_float(1.5e-7), "1.5e-07");
/// assert_eq!(format_float(f64::NAN), "nan");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return exponent_form(value);
    }
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// `1.5e-7` becomes `1.5e-07`, `1e16` becomes `1e+16`.
fn exponent_form(value: f64) -> String {
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        },
        None => text,
    }
}

/// Quotes a string for display inside an array.
///
/// Single quotes are used unless the text contains a single quote and no
/// double quote.
fn quote(text: &str) -> String {
    let delimiter = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push(delimiter);
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c if c == delimiter => {
                quoted.push('\\');
                quoted.push(c);
            },
            c => quoted.push(c),
        }
    }
    quoted.push(delimiter);
    quoted
}

/// Expands backslash escape sequences in text about to be written out.
///
/// `\n`, `\t`, `\'`, `\"` and `\\` become a newline, a tab, a single quote, a
/// double quote and a backslash. A backslash followed by any other character
/// drops both; a trailing backslash is dropped.
///
/// # Example
/// ```
/// use quill::interpreter::value::format::expand_escapes;
///
/// assert_eq!(expand_escapes(r"a\tb\n"), "a\tb\n");
/// assert_eq!(expand_escapes(r#"say \"hi\""#), "say \"hi\"");
/// assert_eq!(expand_escapes(r"\x41"), "41");
/// ```
#[must_use]
pub fn expand_escapes(text: &str) -> String {
    let mut expanded = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            expanded.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => expanded.push('\n'),
            Some('t') => expanded.push('\t'),
            Some('\'') => expanded.push('\''),
            Some('"') => expanded.push('"'),
            Some('\\') => expanded.push('\\'),
            _ => {},
        }
    }
    expanded
}
