//! Error types for BXSON parsing, encoding and serialization.
//!
//! Only two kinds of anomaly abort an operation: a grammar violation while
//! parsing, and a bad encoding selector handed to the encoder. Everything else
//! (stray characters, malformed binary payloads) degrades gracefully and is
//! reported as a [`Diagnostic`](crate::Diagnostic) next to a usable result.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: token sequence does not match the grammar, with line information
//! - **Unexpected End of Input**: the token stream ran out in the middle of a value
//! - **Depth Limit**: containers nested deeper than the parser accepts
//! - **Unknown Encoding**: an encoding selector that is not `b32`, `b58` or `b64`
//! - **I/O Errors**: stream reading/writing failures
//!
//! ## Examples
//!
//! ```rust
//! use serde_bxson::{parse, Error};
//!
//! let result = parse("[1, 2");
//! assert!(matches!(result, Err(Error::UnexpectedEof { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Terminal failures of BXSON operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// A token that does not fit the grammar at this position
    #[error("Syntax error at token '{token}' (value: '{value}') at line {line}")]
    Syntax {
        token: String,
        value: String,
        line: usize,
    },

    /// The token stream ended in the middle of a production
    #[error("Unexpected end of input after line {line}: expected {expected}")]
    UnexpectedEof { line: usize, expected: String },

    /// Containers nested deeper than the parser allows
    #[error("Nesting too deep at line {line}")]
    DepthLimit { line: usize },

    /// Encoding selector that names none of the supported alphabets
    #[error("Unknown binary encoding '{0}': expected one of b32, b58, b64")]
    UnknownEncoding(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error for the offending token.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bxson::Error;
    ///
    /// let err = Error::syntax("COLON", ":", 3);
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn syntax(token: &str, value: &str, line: usize) -> Self {
        Error::Syntax {
            token: token.to_string(),
            value: value.to_string(),
            line,
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(line: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            line,
            expected: expected.to_string(),
        }
    }

    /// Creates an unknown encoding error for a selector that could not be resolved.
    pub fn unknown_encoding(name: &str) -> Self {
        Error::UnknownEncoding(name.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bxson::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for stream reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the source line the error points at, if it has one.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Syntax { line, .. }
            | Error::UnexpectedEof { line, .. }
            | Error::DepthLimit { line } => Some(*line),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

/// Why a binary payload could not be turned into bytes.
#[derive(Debug, Clone, Error)]
pub enum PayloadError {
    #[error(transparent)]
    Base32(#[from] data_encoding::DecodeError),

    #[error(transparent)]
    Base58(#[from] bs58::decode::Error),

    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_message_carries_token_context() {
        let err = Error::syntax("RBRACE", "}", 7);
        let msg = err.to_string();
        assert!(msg.contains("RBRACE"));
        assert!(msg.contains("'}'"));
        assert!(msg.contains("line 7"));
        assert_eq!(err.line(), Some(7));
    }

    #[test]
    fn test_unknown_encoding_has_no_line() {
        let err = Error::unknown_encoding("b99");
        assert!(err.to_string().contains("b99"));
        assert_eq!(err.line(), None);
    }
}
