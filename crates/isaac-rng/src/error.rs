//! Errors raised when rebuilding a generator from persisted state.

use thiserror::Error;

/// State reload errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("missing state field `{field}`")]
    MissingField { field: &'static str },

    #[error("malformed {field} value: {token:?}")]
    Parse { field: &'static str, token: String },

    #[error("incomplete state: expected {expected} {section} words, found {found}")]
    Incomplete {
        section: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("too many {section} words: expected {expected}, found {found}")]
    Oversized {
        section: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("cursor {0} out of range (max 256)")]
    CursorOutOfRange(usize),

    #[error("unexpected trailing data: {token:?}")]
    TrailingData { token: String },
}
