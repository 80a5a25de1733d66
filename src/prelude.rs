//! Convenient imports for snapdump.
//!
//! This module re-exports the most commonly used types so you can get
//! started with a single import:
//!
//! ```ignore
//! use snapdump::prelude::*;
//!
//! let engine = DumpEngine::new(catalog);
//! engine.dump(&backend, &mut sink)?;
//! ```

// Main entry point
pub use crate::engine::DumpEngine;

// Error handling
pub use crate::error::{Error, Result};

// Schema model
pub use snapdump_core::{
    FieldDescriptor, FieldKind, RecordType, ScalarKind, SchemaCatalog,
};

// Records and values
pub use snapdump_core::{Record, RecordId, Value};

// Backend seam
pub use snapdump_engine::{Backend, BackendError, MemoryBackend};

// Reports
pub use snapdump_engine::{Discrepancy, RestoreReport};
