//! Core types for snapdump
//!
//! This crate defines the data model shared by the wire format and the
//! engine: the [`Value`] tagged union for field contents, [`Record`] and
//! [`RecordId`] for stored instances, and the [`SchemaCatalog`] describing
//! record types and their reference relationships.
//!
//! Everything here is plain metadata and values. No I/O happens in this
//! crate.

pub mod error;
pub mod record;
pub mod schema;
pub mod value;

pub use error::SchemaError;
pub use record::{Record, RecordId};
pub use schema::{FieldDescriptor, FieldKind, RecordType, ScalarKind, SchemaCatalog, SchemaCatalogBuilder};
pub use value::Value;
