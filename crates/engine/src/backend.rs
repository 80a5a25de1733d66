//! Storage backend collaborator interface
//!
//! The engine never touches storage directly: dump reads through
//! [`Backend::iterate_records`], restore writes through
//! [`Backend::write_record`] and [`Backend::update_reference_field`]. The
//! restore loader brackets its writes with [`begin`]/[`commit`]/[`rollback`]
//! so a transactional backend can make a failed restore leave the store
//! untouched; non-transactional backends keep the no-op defaults.
//!
//! [`begin`]: Backend::begin
//! [`commit`]: Backend::commit
//! [`rollback`]: Backend::rollback

use snapdump_core::{Record, RecordId, Value};
use thiserror::Error;

/// The storage layer rejected an operation (e.g. constraint violation).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    /// Build an error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        BackendError(reason.into())
    }
}

/// Result type for backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Storage collaborator required by the engine.
pub trait Backend {
    /// Lazily iterate all stored records of a type, in any order.
    ///
    /// Unknown-but-valid types yield an empty iterator; the dump writer
    /// sorts, so iteration order carries no meaning.
    fn iterate_records<'a>(
        &'a self,
        type_name: &str,
    ) -> BackendResult<Box<dyn Iterator<Item = BackendResult<Record>> + 'a>>;

    /// Persist one record, returning its stored identifier.
    ///
    /// Backends that assign their own identifiers return the assigned one;
    /// the restore loader remaps references accordingly.
    fn write_record(&mut self, type_name: &str, record: &Record) -> BackendResult<RecordId>;

    /// Overwrite a single reference field of an existing record.
    ///
    /// Used only by the deferred second restore pass, after every record of
    /// the relevant cyclic component exists.
    fn update_reference_field(
        &mut self,
        type_name: &str,
        id: &RecordId,
        field: &str,
        value: &Value,
    ) -> BackendResult<()>;

    /// Open a transactional scope for a restore. Default: no-op.
    fn begin(&mut self) -> BackendResult<()> {
        Ok(())
    }

    /// Commit the scope opened by [`begin`](Backend::begin). Default: no-op.
    fn commit(&mut self) -> BackendResult<()> {
        Ok(())
    }

    /// Discard every write since [`begin`](Backend::begin). Default: no-op.
    fn rollback(&mut self) -> BackendResult<()> {
        Ok(())
    }
}
