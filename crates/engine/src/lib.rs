//! snapdump engine
//!
//! The algorithmic core of snapdump: the dependency resolver over the
//! reference graph, the dump writer, the restore loader with its deferred
//! second pass, and the integrity verifier. Storage is abstracted behind
//! the [`Backend`] trait; [`MemoryBackend`] is the in-memory reference
//! implementation.
//!
//! Dump and restore are single-threaded synchronous passes over the whole
//! database. Dump is read-only; restore runs inside one backend
//! transaction scope and either completes fully or leaves the store
//! unchanged.

pub mod backend;
pub mod dump;
pub mod error;
pub mod memory;
pub mod resolve;
pub mod restore;
pub mod verify;

pub use backend::{Backend, BackendError, BackendResult};
pub use dump::dump;
pub use error::{Error, Result};
pub use memory::MemoryBackend;
pub use resolve::{resolve, ResolvedSchema, ResolvedType};
pub use restore::{restore, RestoreReport};
pub use verify::{verify, Discrepancy};
