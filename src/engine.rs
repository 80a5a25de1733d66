//! Main entry point: the [`DumpEngine`] facade.

use crate::error::Result;
use snapdump_core::SchemaCatalog;
use snapdump_engine::{Backend, Discrepancy, RestoreReport};
use std::io::{BufRead, Write};

/// Dump/restore engine bound to one immutable schema catalog.
///
/// The catalog is supplied once at construction and passed into every
/// operation; there is no ambient "current schema".
///
/// ```ignore
/// use snapdump::prelude::*;
///
/// let engine = DumpEngine::new(catalog);
/// let mut out = Vec::new();
/// engine.dump(&backend, &mut out)?;
/// engine.restore(&mut other_backend, out.as_slice())?;
/// ```
#[derive(Debug, Clone)]
pub struct DumpEngine {
    catalog: SchemaCatalog,
}

impl DumpEngine {
    /// Bind an engine to a schema catalog.
    pub fn new(catalog: SchemaCatalog) -> Self {
        DumpEngine { catalog }
    }

    /// The schema catalog this engine operates on.
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Dump every stored record into `sink`.
    ///
    /// Deterministic: dumping the same database state twice yields
    /// byte-identical output. Read-only against the backend. On error the
    /// sink's partial contents are not a valid dump.
    pub fn dump<B, W>(&self, backend: &B, sink: &mut W) -> Result<()>
    where
        B: Backend + ?Sized,
        W: Write + ?Sized,
    {
        snapdump_engine::dump(&self.catalog, backend, sink)?;
        Ok(())
    }

    /// Restore a dump stream into the backend.
    ///
    /// Runs inside one backend transaction scope: on failure the backend
    /// is rolled back and left as it was before the call.
    pub fn restore<B, R>(&self, backend: &mut B, source: R) -> Result<RestoreReport>
    where
        B: Backend + ?Sized,
        R: BufRead,
    {
        Ok(snapdump_engine::restore(&self.catalog, backend, source)?)
    }

    /// Compare a dump stream against the backend's current state.
    ///
    /// Diagnostic only: differences come back as [`Discrepancy`] values,
    /// never as errors.
    pub fn verify<B, R>(&self, backend: &B, source: R) -> Result<Vec<Discrepancy>>
    where
        B: Backend + ?Sized,
        R: BufRead,
    {
        Ok(snapdump_engine::verify(&self.catalog, backend, source)?)
    }
}
