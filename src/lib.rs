//! # snapdump
//!
//! Deterministic whole-database snapshot dump/restore engine.
//!
//! Given a relational schema with foreign-key relationships, snapdump
//! produces a human-diffable text serialization of every stored record and
//! reconstructs the same database state from it. Record types are emitted
//! in dependency order (referenced types first), rows sorted by primary
//! identifier, every token canonical: two dumps of equal content are
//! byte-identical.
//!
//! ## Quick Start
//!
//! ```ignore
//! use snapdump::prelude::*;
//!
//! let catalog = SchemaCatalog::builder()
//!     .register(
//!         RecordType::new("Author")
//!             .field(FieldDescriptor::scalar("name", ScalarKind::String)),
//!     )
//!     .register(
//!         RecordType::new("Book")
//!             .field(FieldDescriptor::scalar("title", ScalarKind::String))
//!             .field(FieldDescriptor::reference("author_id", "Author")),
//!     )
//!     .build()?;
//!
//! let engine = DumpEngine::new(catalog.clone());
//!
//! // Capture the whole database as diffable text
//! let mut dump = Vec::new();
//! engine.dump(&backend, &mut dump)?;
//!
//! // Replay it into an empty store
//! let mut target = MemoryBackend::new(&catalog);
//! let report = engine.restore(&mut target, dump.as_slice())?;
//! println!("{}", report.summary());
//! ```
//!
//! ## Cyclic schemas
//!
//! Reference cycles (mutual or self references) are handled with a
//! deferred second pass on restore: the records of a cycle are written
//! first with those reference fields null, then the references are
//! populated once every record of the cycle exists.

#![warn(missing_docs)]

mod engine;
mod error;

pub mod prelude;

// Re-export main entry points
pub use engine::DumpEngine;
pub use error::{Error, Result};

// Re-export the data model
pub use snapdump_core::{
    FieldDescriptor, FieldKind, Record, RecordId, RecordType, ScalarKind, SchemaCatalog,
    SchemaCatalogBuilder, SchemaError, Value,
};

// Re-export the backend seam and reports
pub use snapdump_engine::{
    Backend, BackendError, BackendResult, Discrepancy, MemoryBackend, RestoreReport,
};
