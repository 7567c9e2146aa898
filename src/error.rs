//! Error types for reading, printing and querying JSON5 trees.
//!
//! Every failure in this crate is an [`Error`]. Each variant projects onto a
//! small, stable [`ErrorCode`] taxonomy through [`Error::code`], which is
//! what callers usually branch on:
//!
//! - **Syntax**: the input (or a path expression) violates the grammar
//! - **MalformedCharacter**: a `\x` / `\u` escape could not be decoded, or
//!   the input is not UTF-8
//! - **BadParameter**: a well-formed request that cannot be satisfied, such
//!   as a missing key or appending to a non-array
//! - **TokenizerInit**: there was nothing to tokenize
//! - **OutOfMemory**: growing a string, array or object failed
//! - **Io**: reading the input failed
//!
//! ## Examples
//!
//! ```rust
//! use json5_tree::{parse_str, ErrorCode};
//!
//! let err = parse_str("{a: \"\\u12\"}").unwrap_err();
//! assert_eq!(err.code(), ErrorCode::MalformedCharacter);
//!
//! let err = parse_str("{a 1}").unwrap_err();
//! assert_eq!(err.code(), ErrorCode::Syntax);
//! ```

use std::collections::TryReserveError;
use std::fmt;
use thiserror::Error;

/// The coarse error taxonomy shared by parse, print and path operations.
///
/// This is also the payload of [`Value::Error`](crate::Value::Error), so a
/// failed sub-parse can be represented inside a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    OutOfMemory,
    BadParameter,
    Syntax,
    TokenizerInit,
    MalformedCharacter,
    Io,
}

impl ErrorCode {
    /// Returns a short, lowercase name for this code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::OutOfMemory => "out of memory",
            ErrorCode::BadParameter => "bad parameter",
            ErrorCode::Syntax => "syntax error",
            ErrorCode::TokenizerInit => "tokenizer init failure",
            ErrorCode::MalformedCharacter => "malformed character",
            ErrorCode::Io => "i/o failure",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Growing backing storage failed
    #[error("Out of memory")]
    OutOfMemory,

    /// Invalid argument, type mismatch, or a lookup that found nothing
    #[error("Bad parameter: {0}")]
    BadParameter(String),

    /// Structural violation of the grammar
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// The tokenizer could not be constructed over the input
    #[error("Tokenizer init failure: {0}")]
    TokenizerInit(String),

    /// A `\x` or `\u` escape (or the raw input encoding) is invalid
    #[error("Malformed character at line {line}, column {col}: {msg}")]
    MalformedCharacter { line: usize, col: usize, msg: String },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Arrays and objects nest deeper than the configured limit
    #[error("Nesting deeper than {limit} levels at line {line}, column {col}")]
    DepthLimitExceeded { line: usize, col: usize, limit: usize },

    /// Custom error raised through serde
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Projects this error onto the coarse [`ErrorCode`] taxonomy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json5_tree::{Error, ErrorCode};
    ///
    /// assert_eq!(Error::syntax(1, 1, "oops").code(), ErrorCode::Syntax);
    /// assert_eq!(Error::bad_parameter("no such key").code(), ErrorCode::BadParameter);
    /// ```
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Error::OutOfMemory => ErrorCode::OutOfMemory,
            Error::BadParameter(_) | Error::Custom(_) => ErrorCode::BadParameter,
            Error::Syntax { .. } | Error::DepthLimitExceeded { .. } => ErrorCode::Syntax,
            Error::TokenizerInit(_) => ErrorCode::TokenizerInit,
            Error::MalformedCharacter { .. } => ErrorCode::MalformedCharacter,
            Error::Io(_) => ErrorCode::Io,
        }
    }

    /// Creates a syntax error with line and column information.
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a malformed-character error with line and column information.
    pub fn malformed(line: usize, col: usize, msg: &str) -> Self {
        Error::MalformedCharacter {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a bad-parameter error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json5_tree::Error;
    ///
    /// let err = Error::bad_parameter("key `x` not found");
    /// assert!(err.to_string().contains("key `x` not found"));
    /// ```
    pub fn bad_parameter<T: fmt::Display>(msg: T) -> Self {
        Error::BadParameter(msg.to_string())
    }

    /// Creates a tokenizer initialization error.
    pub fn tokenizer_init(msg: &str) -> Self {
        Error::TokenizerInit(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::OutOfMemory
    }
}

impl From<indexmap::TryReserveError> for Error {
    fn from(_: indexmap::TryReserveError) -> Self {
        Error::OutOfMemory
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Converts a byte offset into a 1-based (line, column) pair.
pub(crate) fn line_col(input: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(input.len());
    let before = &input.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);
    (line, offset - line_start + 1)
}
