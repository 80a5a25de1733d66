//! Unified error types for snapdump.
//!
//! This module wraps the engine's internal errors into a stable public
//! enum matching the documented taxonomy.

use thiserror::Error;

/// All snapdump errors.
///
/// Every error is fatal to the dump or restore call that produced it; the
/// message carries the offending record's type, identifier, and field
/// where applicable.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed schema metadata (aborts before any I/O)
    #[error("schema error: {0}")]
    Schema(String),

    /// A record's field cannot be canonicalized during dump
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Malformed dump stream during restore
    #[error("parse error: {0}")]
    Parse(String),

    /// Dangling or unresolved identifier
    #[error("reference error: {0}")]
    Reference(String),

    /// The storage layer rejected a write
    #[error("backend error: {0}")]
    Backend(String),

    /// Sink or source failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for snapdump operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error came from parsing the dump stream.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    /// Check if this error is a dangling or unresolved reference.
    pub fn is_reference(&self) -> bool {
        matches!(self, Error::Reference(_))
    }

    /// Check if this error was raised by the storage layer.
    pub fn is_backend(&self) -> bool {
        matches!(self, Error::Backend(_))
    }
}

// Convert from internal engine errors
impl From<snapdump_engine::Error> for Error {
    fn from(e: snapdump_engine::Error) -> Self {
        use snapdump_engine::Error as EngineError;
        match e {
            EngineError::Schema(err) => Error::Schema(err.to_string()),
            EngineError::Io(io_err) => Error::Io(io_err),
            err @ EngineError::Serialization { .. } => Error::Serialization(err.to_string()),
            err @ EngineError::Parse { .. } => Error::Parse(err.to_string()),
            err @ EngineError::Reference { .. } => Error::Reference(err.to_string()),
            err @ EngineError::Backend { .. } => Error::Backend(err.to_string()),
        }
    }
}

impl From<snapdump_core::SchemaError> for Error {
    fn from(e: snapdump_core::SchemaError) -> Self {
        Error::Schema(e.to_string())
    }
}
