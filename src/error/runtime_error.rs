#[derive(Debug)]
/// Represents all errors that can occur during execution.
///
/// Every variant carries the source line of the construct that failed.
/// Errors escaping a user function body are wrapped in
/// [`RuntimeError::FunctionFailed`], one layer per active call.
pub enum RuntimeError {
    /// Tried to read a variable that is bound in no frame.
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a function that is neither built-in nor defined.
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Indexed a variable that does not hold an array.
    NotAnArray {
        /// The name of the variable.
        name:  String,
        /// The type of the value it holds.
        found: &'static str,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An array index was not an integer.
    InvalidIndex {
        /// The type of the index value.
        found: &'static str,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An array index was negative or past the end.
    IndexOutOfBounds {
        /// The name of the array variable.
        name:  String,
        /// The requested index.
        index: i64,
        /// The length of the array.
        len:   usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An operator was applied to incompatible values.
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Attempted to divide by zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Integer arithmetic overflowed.
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// `atoi` received text that is neither an integer nor a float.
    InvalidConversion {
        /// The text that failed to convert.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Attempted to redefine a built-in function.
    BuiltinFunctionRedefinition {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A function parameter was not a plain identifier.
    InvalidParameter {
        /// The function being defined.
        function: String,
        /// The kind of expression found in the parameter list.
        found:    &'static str,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The same parameter name appeared twice in one definition.
    DuplicateParameter {
        /// The function being defined.
        function: String,
        /// The repeated parameter name.
        name:     String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A function was called with the wrong number of arguments.
    ArgumentCountMismatch {
        /// The name of the function.
        name:     String,
        /// The number of declared parameters.
        expected: usize,
        /// The number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The referenced external script does not exist.
    ScriptNotFound {
        /// The resolved path.
        path: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The external script could not be started.
    ScriptSpawn {
        /// The resolved path.
        path:    String,
        /// Details from the operating system.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// The external script exited unsuccessfully.
    ScriptFailed {
        /// The resolved path.
        path:   String,
        /// The exit code, if the process exited normally.
        code:   Option<i32>,
        /// The captured error stream, trimmed.
        stderr: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// The external script ran past the configured timeout and was killed.
    ScriptTimeout {
        /// The resolved path.
        path:    String,
        /// The configured timeout in seconds.
        seconds: u64,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// User function calls nested deeper than the configured limit.
    RecursionLimit {
        /// The function whose call exceeded the limit.
        name:  String,
        /// The configured limit.
        limit: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Reading from or writing to the host streams failed.
    Io {
        /// Details about the failure.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An error escaped the body of a user function.
    FunctionFailed {
        /// The name of the function.
        name:   String,
        /// The line of the call.
        line:   usize,
        /// The error raised inside the body.
        source: Box<Self>,
    },
}

/// Broad classes of runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unbound variable or function, or an array used as a scalar.
    Name,
    /// Operator applied to incompatible values.
    Type,
    /// Non-integer or out-of-range array index.
    Index,
    /// Division by zero, overflow, failed numeric conversion.
    Arithmetic,
    /// Invalid function definition or call arity.
    Definition,
    /// Missing or failing external script.
    ExternalProcess,
    /// Call depth exhausted.
    Resource,
    /// Host stream failure.
    Io,
}

impl RuntimeError {
    /// Returns the class of the underlying failure.
    ///
    /// For [`RuntimeError::FunctionFailed`] this is the kind of the innermost
    /// error, so a failure keeps its class however many calls it unwinds
    /// through.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownVariable { .. }
            | Self::UnknownFunction { .. }
            | Self::NotAnArray { .. } => ErrorKind::Name,
            Self::InvalidIndex { .. } | Self::IndexOutOfBounds { .. } => ErrorKind::Index,
            Self::TypeError { .. } => ErrorKind::Type,
            Self::DivisionByZero { .. } | Self::Overflow { .. } | Self::InvalidConversion { .. } => {
                ErrorKind::Arithmetic
            },
            Self::BuiltinFunctionRedefinition { .. }
            | Self::InvalidParameter { .. }
            | Self::DuplicateParameter { .. }
            | Self::ArgumentCountMismatch { .. } => ErrorKind::Definition,
            Self::ScriptNotFound { .. }
            | Self::ScriptSpawn { .. }
            | Self::ScriptFailed { .. }
            | Self::ScriptTimeout { .. } => ErrorKind::ExternalProcess,
            Self::RecursionLimit { .. } => ErrorKind::Resource,
            Self::Io { .. } => ErrorKind::Io,
            Self::FunctionFailed { .. } => self.root_cause().kind(),
        }
    }

    /// Follows [`RuntimeError::FunctionFailed`] wrappers down to the error
    /// that started the unwinding.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut error = self;
        while let Self::FunctionFailed { source, .. } = error {
            error = source.as_ref();
        }
        error
    }

    /// Returns the source line stored in the error.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownVariable { line, .. }
            | Self::UnknownFunction { line, .. }
            | Self::NotAnArray { line, .. }
            | Self::InvalidIndex { line, .. }
            | Self::IndexOutOfBounds { line, .. }
            | Self::TypeError { line, .. }
            | Self::DivisionByZero { line }
            | Self::Overflow { line }
            | Self::InvalidConversion { line, .. }
            | Self::BuiltinFunctionRedefinition { line, .. }
            | Self::InvalidParameter { line, .. }
            | Self::DuplicateParameter { line, .. }
            | Self::ArgumentCountMismatch { line, .. }
            | Self::ScriptNotFound { line, .. }
            | Self::ScriptSpawn { line, .. }
            | Self::ScriptFailed { line, .. }
            | Self::ScriptTimeout { line, .. }
            | Self::RecursionLimit { line, .. }
            | Self::Io { line, .. }
            | Self::FunctionFailed { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariable { name, line } => {
                write!(f, "Error on line {line}: Unknown variable '{name}'.")
            },
            Self::UnknownFunction { name, line } => {
                write!(f, "Error on line {line}: Unknown function '{name}'.")
            },
            Self::NotAnArray { name, found, line } => write!(f,
                                                             "Error on line {line}: Variable '{name}' holds {found}, not an array."),
            Self::InvalidIndex { found, line } => {
                write!(f, "Error on line {line}: Array index must be an integer, found {found}.")
            },
            Self::IndexOutOfBounds { name, index, len, line } => write!(f,
                                                                        "Error on line {line}: Index {index} is out of bounds for '{name}' (length {len})."),
            Self::TypeError { details, line } => {
                write!(f, "Error on line {line}: Type error: {details}.")
            },
            Self::DivisionByZero { line } => write!(f, "Error on line {line}: Division by zero."),
            Self::Overflow { line } => write!(f, "Error on line {line}: Integer overflow."),
            Self::InvalidConversion { text, line } => {
                write!(f, "Error on line {line}: Cannot convert '{text}' to a number.")
            },
            Self::BuiltinFunctionRedefinition { name, line } => {
                write!(f, "Error on line {line}: Cannot redefine built-in function '{name}'.")
            },
            Self::InvalidParameter { function, found, line } => write!(f,
                                                                       "Error on line {line}: Function '{function}' has a parameter of kind {found}, expected an identifier."),
            Self::DuplicateParameter { function, name, line } => write!(f,
                                                                        "Error on line {line}: Function '{function}' declares parameter '{name}' more than once."),
            Self::ArgumentCountMismatch { name,
                                          expected,
                                          found,
                                          line, } => write!(f,
                                                            "Error on line {line}: Function '{name}' takes {expected} argument(s), but {found} were given."),
            Self::ScriptNotFound { path, line } => {
                write!(f, "Error on line {line}: Script '{path}' does not exist.")
            },
            Self::ScriptSpawn { path, details, line } => {
                write!(f, "Error on line {line}: Could not start script '{path}': {details}")
            },
            Self::ScriptFailed { path,
                                 code,
                                 stderr,
                                 line, } => {
                match code {
                    Some(code) => {
                        write!(f, "Error on line {line}: Script '{path}' exited with status {code}")?;
                    },
                    None => write!(f, "Error on line {line}: Script '{path}' was terminated")?,
                }
                if stderr.is_empty() {
                    write!(f, ".")
                } else {
                    write!(f, ":\n{stderr}")
                }
            },
            Self::ScriptTimeout { path, seconds, line } => write!(f,
                                                                  "Error on line {line}: Script '{path}' did not finish within {seconds} second(s)."),
            Self::RecursionLimit { name, limit, line } => write!(f,
                                                                 "Error on line {line}: Calling '{name}' exceeds the maximum call depth of {limit}."),
            Self::Io { details, line } => write!(f, "Error on line {line}: I/O error: {details}"),
            Self::FunctionFailed { name, line, source } => {
                write!(f, "{source}\n  in function '{name}' called on line {line}")
            },
        }
    }
}

// `FunctionFailed` already renders its cause; use `root_cause` to reach it.
impl std::error::Error for RuntimeError {}
