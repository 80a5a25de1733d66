//! Post-restore integrity verification
//!
//! Compares per-type record counts and primary-identifier sets between a
//! dump stream and the live backend. Purely diagnostic: discrepancies come
//! back as a report, never as an error. Only an unreadable stream or a
//! failing backend raises.
//!
//! Identifier comparison is direct, so the check is meaningful for
//! id-preserving backends (the fixture/backup use case). After a restore
//! through an id-assigning backend, consult the
//! [`RestoreReport`](crate::restore::RestoreReport) instead.

use crate::backend::Backend;
use crate::error::{Error, Result};
use snapdump_core::{RecordId, SchemaCatalog};
use snapdump_wire as wire;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::BufRead;
use tracing::{debug, warn};

/// One difference between a dump stream and the backend state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    /// Record counts differ for a type
    CountMismatch {
        /// Record type name
        type_name: String,
        /// Records in the dump
        dump: usize,
        /// Records in the backend
        backend: usize,
    },
    /// An identifier from the dump has no backend record
    MissingInBackend {
        /// Record type name
        type_name: String,
        /// Identifier present only in the dump
        id: RecordId,
    },
    /// A backend record's identifier does not appear in the dump
    UnexpectedInBackend {
        /// Record type name
        type_name: String,
        /// Identifier present only in the backend
        id: RecordId,
    },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::CountMismatch { type_name, dump, backend } => {
                write!(f, "{type_name}: dump has {dump} records, backend has {backend}")
            }
            Discrepancy::MissingInBackend { type_name, id } => {
                write!(f, "{type_name}[{id}] is in the dump but not in the backend")
            }
            Discrepancy::UnexpectedInBackend { type_name, id } => {
                write!(f, "{type_name}[{id}] is in the backend but not in the dump")
            }
        }
    }
}

/// Compare a dump stream against the backend's current state.
pub fn verify<B, R>(
    catalog: &SchemaCatalog,
    backend: &B,
    source: R,
) -> Result<Vec<Discrepancy>>
where
    B: Backend + ?Sized,
    R: BufRead,
{
    let dump_ids = collect_dump_ids(catalog, source)?;

    let mut discrepancies = Vec::new();
    for ty in catalog.types() {
        let empty = BTreeSet::new();
        let in_dump = dump_ids.get(ty.name()).unwrap_or(&empty);

        let mut in_backend = BTreeSet::new();
        let iter = backend
            .iterate_records(ty.name())
            .map_err(|e| Error::backend_table(ty.name(), e))?;
        for item in iter {
            in_backend.insert(item.map_err(|e| Error::backend_table(ty.name(), e))?.id);
        }

        if in_dump.len() != in_backend.len() {
            discrepancies.push(Discrepancy::CountMismatch {
                type_name: ty.name().to_string(),
                dump: in_dump.len(),
                backend: in_backend.len(),
            });
        }
        for id in in_dump.difference(&in_backend) {
            discrepancies.push(Discrepancy::MissingInBackend {
                type_name: ty.name().to_string(),
                id: id.clone(),
            });
        }
        for id in in_backend.difference(in_dump) {
            discrepancies.push(Discrepancy::UnexpectedInBackend {
                type_name: ty.name().to_string(),
                id: id.clone(),
            });
        }
    }

    if discrepancies.is_empty() {
        debug!("integrity check passed");
    } else {
        warn!(count = discrepancies.len(), "integrity check found discrepancies");
    }
    Ok(discrepancies)
}

/// Per-type identifier sets from a dump stream (structure parsed strictly,
/// field tokens not decoded).
fn collect_dump_ids<R: BufRead>(
    catalog: &SchemaCatalog,
    source: R,
) -> Result<BTreeMap<String, BTreeSet<RecordId>>> {
    let mut lines = source.lines().enumerate();

    match lines.next() {
        None => return Err(Error::parse_msg(1, "missing header line")),
        Some((_, line)) => match wire::parse_line(&line?).map_err(|e| Error::parse(1, e))? {
            wire::Line::Header { version } if version == wire::FORMAT_VERSION => {}
            wire::Line::Header { version } => {
                return Err(Error::parse(1, wire::ParseError::UnsupportedVersion(version)))
            }
            _ => return Err(Error::parse_msg(1, "expected header line")),
        },
    }

    let mut ids: BTreeMap<String, BTreeSet<RecordId>> = BTreeMap::new();
    let mut current: Option<(String, usize)> = None;
    for (index, line) in lines {
        let line_no = index + 1;
        let line = line?;
        match wire::parse_line(&line).map_err(|e| Error::parse(line_no, e))? {
            wire::Line::Header { .. } => {
                return Err(Error::parse_msg(line_no, "duplicate header line"));
            }
            wire::Line::Table(name) => {
                let ty = catalog.get(&name).ok_or_else(|| {
                    Error::parse_msg(line_no, format!("unknown record type {name:?}"))
                })?;
                ids.entry(name.clone()).or_default();
                current = Some((name, ty.fields().len()));
            }
            wire::Line::Row(tokens) => {
                let (name, field_count) = current.as_ref().ok_or_else(|| {
                    Error::parse_msg(line_no, "row before any %table section")
                })?;
                if tokens.len() != field_count + 1 {
                    return Err(Error::parse_msg(
                        line_no,
                        format!("expected {} tokens, got {}", field_count + 1, tokens.len()),
                    ));
                }
                let id = wire::decode_id(&tokens[0]).map_err(|e| Error::parse(line_no, e))?;
                ids.entry(name.clone()).or_default().insert(id);
            }
        }
    }
    Ok(ids)
}
