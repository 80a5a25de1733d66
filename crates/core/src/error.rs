//! Schema validation errors

use thiserror::Error;

/// Malformed schema metadata. Fatal before any I/O happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A record type was registered with an empty name
    #[error("record type with empty name")]
    EmptyTypeName,

    /// Two record types share a name
    #[error("duplicate record type {type_name:?}")]
    DuplicateType {
        /// Offending type name
        type_name: String,
    },

    /// Two fields of one record type share a name
    #[error("duplicate field {field:?} on record type {type_name:?}")]
    DuplicateField {
        /// Owning type name
        type_name: String,
        /// Offending field name
        field: String,
    },

    /// A reference field points at a type the catalog does not contain
    #[error("field {field:?} on {type_name:?} references unknown record type {target:?}")]
    UnknownReferenceTarget {
        /// Owning type name
        type_name: String,
        /// Referencing field name
        field: String,
        /// Missing target type name
        target: String,
    },
}
