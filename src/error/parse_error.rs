#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during parsing.
///
/// Parsing stops at the first error; there is no recovery.
pub enum ParseError {
    /// Found a token the grammar does not allow at this point.
    UnexpectedToken {
        /// The grammar name of the token kind, such as `ID` or `END`.
        kind:     &'static str,
        /// The token as written in the source.
        token:    String,
        /// What the parser was looking for.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
        /// Byte offset of the token in the source.
        offset:   usize,
    },
    /// Reached the end of input in the middle of a construct.
    UnexpectedEndOfInput {
        /// What the parser was looking for.
        expected: String,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { kind,
                                    token,
                                    expected,
                                    line,
                                    offset, } => write!(f,
                                                        "Error on line {line}: Syntax error at {kind} '{token}' (position {offset}), expected {expected}."),

            Self::UnexpectedEndOfInput { expected } => {
                write!(f, "Syntax error: unexpected end of input, expected {expected}.")
            },
        }
    }
}

impl std::error::Error for ParseError {}
