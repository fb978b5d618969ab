//! Error types raised while turning formula text into a program.
//!
//! Execution itself never fails: numeric edge cases surface as IEEE
//! infinities and NaNs, so only scanning and parsing have error types.

use crate::processor::lexer::TokenKind;

/// Failure to scan a single token.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    /// `e`/`E` not followed by at least one digit (after an optional sign).
    #[error("malformed exponent in '{0}'")]
    MalformedExponent(String),

    /// A `.` with no digits on either side.
    #[error("malformed decimal literal '{0}'")]
    MalformedDecimal(String),
}

/// The three classes of parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
}

/// First error hit while parsing a formula.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("lexical error: {0}")]
    Lexical(#[from] LexError),

    #[error("expected {expected} but found {found}")]
    Expected {
        expected: TokenKind,
        found: TokenKind,
    },

    #[error("unexpected value (found {0})")]
    UnexpectedToken(String),

    #[error("syntax error near '{0}' at end of input")]
    TrailingInput(String),

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("invalid numeric literal '{0}'")]
    InvalidNumber(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("wrong number of arguments for function '{name}': expected {expected}, found {found}")]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Lexical(_) | Self::InvalidNumber(_) => ErrorKind::Lexical,
            Self::Expected { .. }
            | Self::UnexpectedToken(_)
            | Self::TrailingInput(_)
            | Self::TooDeep(_) => ErrorKind::Syntax,
            Self::UnknownFunction(_) | Self::ArgumentCount { .. } => ErrorKind::Semantic,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
