#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents a fragment of source the lexer could not recognize.
pub enum LexError {
    /// A character (or run of characters) that starts no valid token.
    IllegalCharacter {
        /// The offending source text.
        fragment: String,
        /// The source line where the fragment was found.
        line:     usize,
    },
}

impl LexError {
    /// Returns the source line of the diagnostic.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::IllegalCharacter { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IllegalCharacter { fragment, line } => {
                write!(f, "Illegal character {fragment} in line {line}")
            },
        }
    }
}

impl std::error::Error for LexError {}
