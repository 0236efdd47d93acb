use logos::Logos;

use crate::error::LexError;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Fractional numeric literal tokens, such as `3.14`.
    #[regex(r"[0-9]+\.[0-9]+", parse_float)]
    Float(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// Quoted string literal, single- or double-quoted. The payload is the raw
    /// text between the quotes; escape sequences are kept verbatim.
    #[regex(r#""(\\"|[^\n"])*""#, strip_quotes)]
    #[regex(r"'(\\'|[^\n'])*'", strip_quotes)]
    Str(String),
    /// Reference to an external script, such as `./scripts/square.py`.
    /// The payload is the path without the leading `./`.
    #[regex(r"\./([a-zA-Z]:\\)?([0-9a-zA-Z_]+[\\/])*[0-9a-zA-Z_]+\.py", script_path)]
    Script(String),
    /// Boolean literal tokens, such as `true`.
    #[token("true", parse_bool)]
    #[token("false", parse_bool)]
    Bool(bool),
    /// `if`
    #[token("if")]
    If,
    /// `begin`
    #[token("begin")]
    Begin,
    /// `else`
    #[token("else")]
    Else,
    /// `end`
    #[token("end")]
    End,
    /// `while`
    #[token("while")]
    While,
    /// `function`
    #[token("function")]
    Function,
    /// `return`
    #[token("return")]
    Return,
    /// `itoa`
    #[token("itoa")]
    Itoa,
    /// `atoi`
    #[token("atoi")]
    Atoi,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `not`
    #[token("not")]
    Not,
    /// Identifier tokens; variable or function names such as `x` or `square`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `# Comments.`
    #[regex(r"#[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// Newlines only advance the line counter.
    #[regex(r"\n+", |lex| {
        lex.extras.line += lex.slice().len();
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs and carriage returns.
    #[regex(r"[ \t\r]+", logos::skip)]
    Ignored,
}

impl Token {
    /// Returns the grammar name of the token kind, used in syntax errors and
    /// token dumps.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::lexer::Token;
    ///
    /// assert_eq!(Token::Identifier("x".into()).kind_name(), "ID");
    /// assert_eq!(Token::LessEqual.kind_name(), "LEQ");
    /// ```
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Float(_) | Self::Integer(_) => "NUMBER",
            Self::Str(_) => "STR",
            Self::Script(_) => "CALLPY",
            Self::Bool(true) => "TRUE",
            Self::Bool(false) => "FALSE",
            Self::If => "IF",
            Self::Begin => "BEGIN",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::While => "WHILE",
            Self::Function => "FUNCTION",
            Self::Return => "RETURN",
            Self::Itoa => "ITOA",
            Self::Atoi => "ATOI",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Identifier(_) => "ID",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Star => "TIMES",
            Self::Slash => "DIVIDE",
            Self::Equals => "ASSIGNMENT",
            Self::EqualEqual => "EQUAL",
            Self::BangEqual => "NEQ",
            Self::LessEqual => "LEQ",
            Self::Less => "LSS",
            Self::GreaterEqual => "GEQ",
            Self::Greater => "GTR",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBracket => "LBRACKET",
            Self::RBracket => "RBRACKET",
            Self::Comma => "COMMA",
            Self::Comment | Self::NewLine | Self::Ignored => "IGNORED",
        }
    }

    /// Returns `true` if the token can begin a condition.
    ///
    /// Used where a condition is optional, such as after `return`.
    #[must_use]
    pub const fn starts_condition(&self) -> bool {
        matches!(self,
                 Self::Float(_)
                 | Self::Integer(_)
                 | Self::Str(_)
                 | Self::Script(_)
                 | Self::Bool(_)
                 | Self::Identifier(_)
                 | Self::Itoa
                 | Self::Atoi
                 | Self::Not
                 | Self::Minus
                 | Self::LParen
                 | Self::LBracket)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float(r) => write!(f, "{r}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Script(path) => write!(f, "./{path}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Identifier(name) => write!(f, "{name}"),
            Self::If => write!(f, "if"),
            Self::Begin => write!(f, "begin"),
            Self::Else => write!(f, "else"),
            Self::End => write!(f, "end"),
            Self::While => write!(f, "while"),
            Self::Function => write!(f, "function"),
            Self::Return => write!(f, "return"),
            Self::Itoa => write!(f, "itoa"),
            Self::Atoi => write!(f, "atoi"),
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
            Self::Not => write!(f, "not"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Equals => write!(f, "="),
            Self::EqualEqual => write!(f, "=="),
            Self::BangEqual => write!(f, "!="),
            Self::LessEqual => write!(f, "<="),
            Self::Less => write!(f, "<"),
            Self::GreaterEqual => write!(f, ">="),
            Self::Greater => write!(f, ">"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBracket => write!(f, "["),
            Self::RBracket => write!(f, "]"),
            Self::Comma => write!(f, ","),
            Self::Comment | Self::NewLine | Self::Ignored => Ok(()),
        }
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
/// Automatically increments as newlines are processed.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Where a token starts in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// 1-based source line.
    pub line:   usize,
    /// Byte offset from the start of the source.
    pub offset: usize,
}

/// The output of [`tokenize`]: every recognized token with its location, and
/// a diagnostic for every fragment that could not be recognized.
#[derive(Debug, Default)]
pub struct Tokens {
    /// Recognized tokens, in source order.
    pub tokens: Vec<(Token, Location)>,
    /// Unrecognized fragments. Scanning skips them and continues.
    pub errors: Vec<LexError>,
}

/// Converts source text into a token stream.
///
/// Whitespace, newlines and `#` comments are skipped. Unrecognized characters
/// do not stop scanning; each one is recorded in [`Tokens::errors`] with its
/// line number and the lexer moves on to the next character. An unterminated
/// string therefore reports only its opening quote, and the text after it is
/// lexed normally.
///
/// # Example
/// ```
/// use quill::interpreter::lexer::{Token, tokenize};
///
/// let lexed = tokenize("x = 1 # set x\n@ y");
/// let kinds: Vec<&Token> = lexed.tokens.iter().map(|(t, _)| t).collect();
///
/// assert_eq!(kinds,
///            vec![&Token::Identifier("x".into()),
///                 &Token::Equals,
///                 &Token::Integer(1),
///                 &Token::Identifier("y".into())]);
/// assert_eq!(lexed.errors.len(), 1);
/// assert_eq!(lexed.tokens[3].1.line, 2);
/// ```
#[must_use]
pub fn tokenize(source: &str) -> Tokens {
    let mut lexed = Tokens::default();
    let mut base = 0;
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });

    while let Some(token) = lexer.next() {
        let location = Location { line:   lexer.extras.line,
                                  offset: base + lexer.span().start, };
        match token {
            Ok(tok) => lexed.tokens.push((tok, location)),
            Err(()) => {
                let Some(consumed) = recover(lexer.slice(), location, &mut lexed) else {
                    continue;
                };
                base = location.offset + consumed;
                lexer = Token::lexer_with_extras(&source[base..],
                                                 LexerExtras { line: location.line });
            },
        }
    }

    log::trace!("lexed {} token(s), {} diagnostic(s)",
                lexed.tokens.len(),
                lexed.errors.len());
    lexed
}

/// Handles a fragment the lexer could not turn into a token.
///
/// A digit run too large for an `i64` is reported whole. Otherwise the
/// longest prefix that is a complete token is kept, or else only the first
/// character is reported, and scanning has to restart after it.
///
/// # Returns
/// - `None`: The whole fragment was consumed.
/// - `Some(usize)`: Bytes of the fragment consumed; scanning restarts there.
fn recover(fragment: &str, location: Location, lexed: &mut Tokens) -> Option<usize> {
    let first = fragment.chars().next().map_or(fragment.len(), char::len_utf8);
    if fragment.len() == first || fragment.bytes().all(|b| b.is_ascii_digit()) {
        lexed.errors.push(LexError::IllegalCharacter { fragment: fragment.to_string(),
                                                       line:     location.line, });
        return None;
    }

    let prefix = fragment.char_indices()
                         .rev()
                         .filter(|&(end, _)| end > 0)
                         .find_map(|(end, _)| {
                             let mut lexer = Token::lexer_with_extras(&fragment[..end],
                                                                      LexerExtras { line: location.line });
                             match lexer.next() {
                                 Some(Ok(token)) if lexer.span() == (0..end) => Some((token, end)),
                                 _ => None,
                             }
                         });

    match prefix {
        Some((token, end)) => {
            lexed.tokens.push((token, location));
            Some(end)
        },
        None => {
            lexed.errors.push(LexError::IllegalCharacter { fragment: fragment[..first].to_string(),
                                                           line:     location.line, });
            Some(first)
        },
    }
}

/// Parses a floating-point literal from the current token slice.
///
/// # Returns
/// - `Some(f64)`: The parsed floating-point value if successful.
/// - `None`: If the token slice is not a valid float.
fn parse_float(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}
/// Parses an integer literal from the current token slice.
///
/// Literals that do not fit in an `i64` are rejected and reported as lexical
/// errors.
fn parse_integer(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}
/// Parses a boolean literal from the current token slice (`true` or `false`).
fn parse_bool(lex: &logos::Lexer<Token>) -> Option<bool> {
    match lex.slice() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
/// Drops the surrounding quote characters of a string literal.
fn strip_quotes(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}
/// Drops the leading `./` of a script reference.
fn script_path(lex: &logos::Lexer<Token>) -> String {
    lex.slice()[2..].to_string()
}
