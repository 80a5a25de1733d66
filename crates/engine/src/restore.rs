//! Restore loader
//!
//! Parses a dump stream and re-creates every record through the backend
//! collaborator. Sections are written in the stream's declared order, which
//! the loader trusts: it matches whatever order the producing dump writer
//! used, so non-deferred references always resolve against already-written
//! rows.
//!
//! References whose target type shares a dependency cycle with the source
//! type are deferred: written as null in the first pass, collected as
//! pending tuples, and applied as explicit updates in a second pass once
//! every record of the component exists.
//!
//! The whole restore runs inside one backend transaction scope: either
//! every record is written and every deferred reference resolved, or the
//! call fails and the backend is rolled back to its pre-restore state.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::resolve::{resolve, ResolvedSchema};
use snapdump_core::{Record, RecordId, RecordType, SchemaCatalog, Value};
use snapdump_wire as wire;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::BufRead;
use tracing::{debug, info, warn};

/// Summary of a completed restore.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    /// Records written in the first pass
    pub records_written: usize,
    /// Deferred references applied in the second pass
    pub deferred_applied: usize,
    /// Records written per table
    pub tables: BTreeMap<String, usize>,
}

impl RestoreReport {
    /// Human-readable one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "restored {} records across {} tables ({} deferred references applied)",
            self.records_written,
            self.tables.len(),
            self.deferred_applied
        )
    }
}

/// A reference update postponed to the second pass. Identifiers are
/// dump-side; both ends go through the id maps before the update.
struct PendingReference {
    type_name: String,
    source: RecordId,
    field: String,
    target_type: String,
    target: RecordId,
}

/// Restore a dump stream into the backend.
///
/// Fatal on the first malformed line, dangling reference, or rejected
/// write; the backend transaction is rolled back on any failure.
pub fn restore<B, R>(catalog: &SchemaCatalog, backend: &mut B, source: R) -> Result<RestoreReport>
where
    B: Backend + ?Sized,
    R: BufRead,
{
    let resolved = resolve(catalog)?;

    backend
        .begin()
        .map_err(|e| Error::backend_op("transaction begin", e))?;

    match run(catalog, &resolved, backend, source) {
        Ok(report) => {
            backend
                .commit()
                .map_err(|e| Error::backend_op("transaction commit", e))?;
            info!(
                records = report.records_written,
                deferred = report.deferred_applied,
                "restore complete"
            );
            Ok(report)
        }
        Err(err) => {
            if let Err(rb) = backend.rollback() {
                warn!(error = %rb, "rollback failed after restore error");
            }
            Err(err)
        }
    }
}

fn run<B, R>(
    catalog: &SchemaCatalog,
    resolved: &ResolvedSchema<'_>,
    backend: &mut B,
    source: R,
) -> Result<RestoreReport>
where
    B: Backend + ?Sized,
    R: BufRead,
{
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

    let mut current: Option<&RecordType> = None;
    let mut tables_seen: HashSet<String> = HashSet::new();
    let mut seen: HashMap<String, HashSet<RecordId>> = HashMap::new();
    let mut id_map: HashMap<String, HashMap<RecordId, RecordId>> = HashMap::new();
    let mut pending: Vec<PendingReference> = Vec::new();
    let mut report = RestoreReport::default();

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
                if !tables_seen.insert(name.clone()) {
                    return Err(Error::parse_msg(
                        line_no,
                        format!("duplicate section for record type {name:?}"),
                    ));
                }
                debug!(table = %name, "restoring table");
                report.tables.entry(name).or_insert(0);
                current = Some(ty);
            }
            wire::Line::Row(tokens) => {
                let ty = current.ok_or_else(|| {
                    Error::parse_msg(line_no, "row before any %table section")
                })?;
                write_row(
                    ty, resolved, backend, &tokens, line_no, &mut seen, &mut id_map,
                    &mut pending, &mut report,
                )?;
            }
        }
    }

    // Second pass: every record of each cyclic component now exists.
    for p in &pending {
        let target = lookup(&id_map, &p.target_type, &p.target).ok_or_else(|| reference_error(p))?;
        let source = lookup(&id_map, &p.type_name, &p.source).ok_or_else(|| reference_error(p))?;
        backend
            .update_reference_field(&p.type_name, &source, &p.field, &target.to_value())
            .map_err(|e| Error::backend_record(&p.type_name, &source, e))?;
        report.deferred_applied += 1;
    }

    Ok(report)
}

#[allow(clippy::too_many_arguments)]
fn write_row<B>(
    ty: &RecordType,
    resolved: &ResolvedSchema<'_>,
    backend: &mut B,
    tokens: &[String],
    line_no: usize,
    seen: &mut HashMap<String, HashSet<RecordId>>,
    id_map: &mut HashMap<String, HashMap<RecordId, RecordId>>,
    pending: &mut Vec<PendingReference>,
    report: &mut RestoreReport,
) -> Result<()>
where
    B: Backend + ?Sized,
{
    let fields = ty.fields();
    if tokens.len() != fields.len() + 1 {
        return Err(Error::parse_msg(
            line_no,
            format!("expected {} tokens, got {}", fields.len() + 1, tokens.len()),
        ));
    }

    let dump_id = wire::decode_id(&tokens[0]).map_err(|e| Error::parse(line_no, e))?;
    if seen.get(ty.name()).is_some_and(|s| s.contains(&dump_id)) {
        return Err(Error::parse_msg(
            line_no,
            format!("duplicate identifier {dump_id} in section {:?}", ty.name()),
        ));
    }

    let deferred = resolved.deferred_fields(ty.name());
    let mut values = Vec::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        let token = &tokens[i + 1];
        let target_type = match field.reference_target() {
            None => {
                values.push(wire::decode_field(field, token).map_err(|e| Error::parse(line_no, e))?);
                continue;
            }
            Some(t) => t,
        };

        if token == wire::NULL_TOKEN {
            if !field.nullable {
                return Err(Error::parse(
                    line_no,
                    wire::ParseError::NullNotAllowed { field: field.name.clone() },
                ));
            }
            values.push(Value::Null);
            continue;
        }

        let target = wire::decode_id(token).map_err(|e| Error::parse(line_no, e))?;
        if deferred.contains(&i) {
            pending.push(PendingReference {
                type_name: ty.name().to_string(),
                source: dump_id.clone(),
                field: field.name.clone(),
                target_type: target_type.to_string(),
                target,
            });
            values.push(Value::Null);
        } else {
            // Outside the deferred mechanism the target must already be
            // written; the stream's order guarantees it for valid dumps.
            let mapped = lookup(id_map, target_type, &target).ok_or_else(|| Error::Reference {
                type_name: ty.name().to_string(),
                id: dump_id.clone(),
                field: field.name.clone(),
                target_type: target_type.to_string(),
                target: target.clone(),
            })?;
            values.push(mapped.to_value());
        }
    }

    let record = Record { id: dump_id.clone(), values };
    let backend_id = backend
        .write_record(ty.name(), &record)
        .map_err(|e| Error::backend_record(ty.name(), &dump_id, e))?;

    seen.entry(ty.name().to_string()).or_default().insert(dump_id.clone());
    id_map
        .entry(ty.name().to_string())
        .or_default()
        .insert(dump_id, backend_id);
    if let Some(count) = report.tables.get_mut(ty.name()) {
        *count += 1;
    }
    report.records_written += 1;
    Ok(())
}

fn lookup(
    id_map: &HashMap<String, HashMap<RecordId, RecordId>>,
    type_name: &str,
    id: &RecordId,
) -> Option<RecordId> {
    id_map.get(type_name).and_then(|m| m.get(id)).cloned()
}

fn reference_error(p: &PendingReference) -> Error {
    Error::Reference {
        type_name: p.type_name.clone(),
        id: p.source.clone(),
        field: p.field.clone(),
        target_type: p.target_type.clone(),
        target: p.target.clone(),
    }
}
