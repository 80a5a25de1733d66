//! Dump writer
//!
//! Streams every stored record into one deterministic text artifact:
//! sections in resolver order, rows sorted by primary identifier, every
//! token canonical. Dumping the same database state twice yields identical
//! bytes.
//!
//! Any error aborts the dump; whatever reached the sink before the failure
//! is not a valid dump stream.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::resolve::resolve;
use snapdump_core::{Record, RecordType, SchemaCatalog};
use snapdump_wire as wire;
use std::io::Write;
use tracing::{debug, info};

/// Dump every record reachable through `backend` into `sink`.
///
/// Read-only against the backend; the only side effect is writing to the
/// sink.
pub fn dump<B, W>(catalog: &SchemaCatalog, backend: &B, sink: &mut W) -> Result<()>
where
    B: Backend + ?Sized,
    W: Write + ?Sized,
{
    let resolved = resolve(catalog)?;

    writeln!(sink, "{}", wire::header_line())?;

    let mut total = 0usize;
    for entry in &resolved.order {
        let ty = entry.record_type;
        debug!(table = ty.name(), "dumping table");
        writeln!(sink, "{}", wire::table_line(ty.name()))?;

        let mut records = Vec::new();
        let iter = backend
            .iterate_records(ty.name())
            .map_err(|e| Error::backend_table(ty.name(), e))?;
        for item in iter {
            records.push(item.map_err(|e| Error::backend_table(ty.name(), e))?);
        }
        records.sort_by(|a, b| a.id.cmp(&b.id));

        for record in &records {
            writeln!(sink, "{}", encode_record(ty, record)?)?;
        }
        total += records.len();
    }

    info!(tables = resolved.order.len(), records = total, "dump complete");
    Ok(())
}

/// Canonical row for one record: identifier token, then one token per
/// field in declared order.
fn encode_record(ty: &RecordType, record: &Record) -> Result<String> {
    let fields = ty.fields();
    if record.values.len() != fields.len() {
        return Err(Error::Serialization {
            type_name: ty.name().to_string(),
            id: record.id.clone(),
            reason: format!(
                "expected {} field values, got {}",
                fields.len(),
                record.values.len()
            ),
        });
    }

    let mut tokens = Vec::with_capacity(fields.len() + 1);
    tokens.push(wire::encode_id(&record.id));
    for (field, value) in fields.iter().zip(&record.values) {
        let token = wire::encode_field(field, value).map_err(|e| Error::Serialization {
            type_name: ty.name().to_string(),
            id: record.id.clone(),
            reason: format!("field {:?}: {}", field.name, e),
        })?;
        tokens.push(token);
    }
    Ok(wire::encode_row(&tokens))
}
