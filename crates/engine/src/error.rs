//! Engine error taxonomy
//!
//! Every error is fatal to the current dump or restore call and carries
//! enough context (type name, identifier, field name where applicable) to
//! locate the offending record. The engine never skips bad records.

use crate::backend::BackendError;
use snapdump_core::{RecordId, SchemaError};
use snapdump_wire::ParseError;
use thiserror::Error;

/// All engine errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed schema metadata; aborts before any I/O
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A record's field cannot be canonicalized during dump
    #[error("cannot serialize {type_name}[{id}]: {reason}")]
    Serialization {
        /// Record type of the offending record
        type_name: String,
        /// Identifier of the offending record
        id: RecordId,
        /// What failed, naming the field where applicable
        reason: String,
    },

    /// Malformed dump stream during restore
    #[error("malformed dump at line {line}: {reason}")]
    Parse {
        /// 1-based line number in the stream
        line: usize,
        /// What was wrong with the line or token
        reason: String,
    },

    /// Dangling or forward identifier, including unresolved deferred
    /// references after the second pass
    #[error("dangling reference {type_name}[{id}].{field} -> {target_type}[{target}]")]
    Reference {
        /// Record type holding the reference
        type_name: String,
        /// Identifier of the referencing record
        id: RecordId,
        /// Referencing field name
        field: String,
        /// Referenced record type
        target_type: String,
        /// Identifier that could not be resolved
        target: RecordId,
    },

    /// The storage layer rejected an operation
    #[error("{context}: {reason}")]
    Backend {
        /// Offending record as `Type[id]`, or the operation name
        context: String,
        /// Backend's own description of the failure
        reason: String,
    },

    /// Sink or source failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn parse(line: usize, err: ParseError) -> Error {
        Error::Parse { line, reason: err.to_string() }
    }

    pub(crate) fn parse_msg(line: usize, reason: impl Into<String>) -> Error {
        Error::Parse { line, reason: reason.into() }
    }

    pub(crate) fn backend_record(type_name: &str, id: &RecordId, err: BackendError) -> Error {
        Error::Backend { context: format!("{}[{}]", type_name, id), reason: err.to_string() }
    }

    pub(crate) fn backend_table(type_name: &str, err: BackendError) -> Error {
        Error::Backend { context: type_name.to_string(), reason: err.to_string() }
    }

    pub(crate) fn backend_op(operation: &str, err: BackendError) -> Error {
        Error::Backend { context: operation.to_string(), reason: err.to_string() }
    }
}
