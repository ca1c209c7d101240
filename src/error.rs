//! Error taxonomy for the reader.
//!
//! Four closed kinds: a malformed-input error, a numeric-coercion error,
//! an API-misuse error, and a premature end-of-input error. Every
//! lexical/structural failure carries the 1-based line and column of the
//! offending token's first character plus the JSONPath at the time of
//! the failure, because tests (and callers) match on that information,
//! not just the message text.

use std::fmt;
use thiserror::Error;

/// The reader's error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The input does not conform to the grammar in effect.
    #[error("{message} at line {line} column {column} (path {path})")]
    MalformedJson {
        message: String,
        line: u64,
        column: u64,
        path: String,
    },

    /// A value was lexically a number but could not be coerced to the
    /// requested numeric type.
    #[error("{message} at line {line} column {column} (path {path})")]
    NumberFormat {
        message: String,
        line: u64,
        column: u64,
        path: String,
    },

    /// The caller invoked an operation the reader's current state does
    /// not admit (wrong token kind requested, or the reader is closed).
    #[error("{message}")]
    IllegalState { message: String },

    /// The character source ran out of input mid-token.
    #[error("end of input at line {line} column {column} (path {path})")]
    UnexpectedEof { line: u64, column: u64, path: String },
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>, line: u64, column: u64, path: &str) -> Self {
        Error::MalformedJson {
            message: message.into(),
            line,
            column,
            path: path.to_string(),
        }
    }

    /// Like [`Error::malformed`] but appends the strict-mode guidance
    /// text, for failures caused specifically by a lenient-only
    /// relaxation being rejected under `Strict`/`LegacyStrict`.
    pub(crate) fn malformed_strict(
        message: impl fmt::Display,
        line: u64,
        column: u64,
        path: &str,
    ) -> Self {
        Error::MalformedJson {
            message: format!(
                "{message} ({hint}line {line} column {column})",
                hint = "Use lenient strictness to accept malformed JSON. "
            ),
            line,
            column,
            path: path.to_string(),
        }
    }

    pub(crate) fn number_format(
        message: impl Into<String>,
        line: u64,
        column: u64,
        path: &str,
    ) -> Self {
        Error::NumberFormat {
            message: message.into(),
            line,
            column,
            path: path.to_string(),
        }
    }

    pub(crate) fn illegal_state(message: impl Into<String>) -> Self {
        Error::IllegalState {
            message: message.into(),
        }
    }

    pub(crate) fn unexpected_eof(line: u64, column: u64, path: &str) -> Self {
        Error::UnexpectedEof {
            line,
            column,
            path: path.to_string(),
        }
    }
}

/// Result alias for all fallible reader operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_strict_mentions_lenient() {
        let err = Error::malformed_strict("unexpected '/'", 1, 1, "$");
        let msg = err.to_string();
        assert!(msg.contains("lenient"), "message was: {msg}");
    }

    #[test]
    fn illegal_state_has_no_position() {
        let err = Error::illegal_state("reader is closed");
        assert_eq!(err.to_string(), "reader is closed");
    }
}
