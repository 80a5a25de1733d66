//! Wire-level error types
//!
//! [`EncodeError`] and [`ParseError`] describe a single token or line; the
//! engine wraps them with record context (type name, identifier, field) and
//! the stream line number.

use thiserror::Error;

/// A field value cannot be canonicalized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// Value kind does not inhabit the declared field kind
    #[error("expected {expected}, got {actual}")]
    KindMismatch {
        /// Declared kind name
        expected: &'static str,
        /// Actual value kind name
        actual: &'static str,
    },

    /// Null in a non-nullable field
    #[error("null value in non-nullable field")]
    UnexpectedNull,
}

/// A dump stream line or token is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// First line is not a valid header
    #[error("invalid header line: {0:?}")]
    InvalidHeader(String),

    /// Header names a format version this build does not read
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),

    /// A `%`-marker line that is neither header nor table
    #[error("unknown marker line: {0:?}")]
    UnknownMarker(String),

    /// Blank lines are not part of the grammar
    #[error("empty line")]
    EmptyLine,

    /// `%table` with no name
    #[error("empty table name")]
    EmptyTableName,

    /// Invalid boolean token
    #[error("invalid bool token: {0:?}")]
    InvalidBool(String),

    /// Invalid integer token
    #[error("invalid integer token: {0:?}")]
    InvalidInt(String),

    /// Invalid float token
    #[error("invalid float token: {0:?}")]
    InvalidFloat(String),

    /// Invalid quoted string token (bad quoting or escape)
    #[error("invalid string token: {0}")]
    InvalidString(String),

    /// Invalid `$`-prefixed base64 token
    #[error("invalid base64 token: {0}")]
    InvalidBase64(String),

    /// Invalid date token
    #[error("invalid date token: {0:?}")]
    InvalidDate(String),

    /// Invalid datetime token
    #[error("invalid datetime token: {0:?}")]
    InvalidDateTime(String),

    /// Token cannot name a record (identifier position or reference field)
    #[error("invalid identifier token: {0:?}")]
    InvalidIdentifier(String),

    /// `null` in a non-nullable field
    #[error("null in non-nullable field {field:?}")]
    NullNotAllowed {
        /// Field name
        field: String,
    },
}
