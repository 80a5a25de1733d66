//! In-memory reference backend
//!
//! BTreeMap-backed store used by the test suite and as the reference
//! implementation of the [`Backend`] contract: snapshot-based transactions,
//! optional backend-assigned identifiers, and an injectable write failure
//! for atomicity tests.

use crate::backend::{Backend, BackendError, BackendResult};
use snapdump_core::{FieldKind, Record, RecordId, SchemaCatalog, Value};
use std::collections::BTreeMap;

type Tables = BTreeMap<String, BTreeMap<RecordId, Record>>;

/// In-memory [`Backend`] implementation.
#[derive(Debug)]
pub struct MemoryBackend {
    catalog: SchemaCatalog,
    tables: Tables,
    snapshot: Option<Tables>,
    assign_ids: bool,
    next_id: i64,
    fail_after_writes: Option<usize>,
    writes_seen: usize,
}

impl MemoryBackend {
    /// Backend that stores records under the identifiers it is given.
    pub fn new(catalog: &SchemaCatalog) -> Self {
        MemoryBackend {
            catalog: catalog.clone(),
            tables: BTreeMap::new(),
            snapshot: None,
            assign_ids: false,
            next_id: 1,
            fail_after_writes: None,
            writes_seen: 0,
        }
    }

    /// Backend that ignores incoming identifiers and assigns its own
    /// auto-increment keys, like a store with backend-assigned ids.
    pub fn with_assigned_ids(catalog: &SchemaCatalog) -> Self {
        MemoryBackend { assign_ids: true, ..MemoryBackend::new(catalog) }
    }

    /// Make every `write_record` after the first `n` fail. Test hook for
    /// failure-atomicity scenarios.
    pub fn fail_after_writes(&mut self, n: usize) {
        self.fail_after_writes = Some(n);
        self.writes_seen = 0;
    }

    /// Number of stored records of one type.
    pub fn record_count(&self, type_name: &str) -> usize {
        self.tables.get(type_name).map_or(0, BTreeMap::len)
    }

    /// Number of stored records across all types.
    pub fn total_records(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    /// All records of one type, sorted by identifier.
    pub fn records(&self, type_name: &str) -> Vec<Record> {
        self.tables
            .get(type_name)
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default()
    }

    /// One record by identifier.
    pub fn record(&self, type_name: &str, id: &RecordId) -> Option<Record> {
        self.tables.get(type_name).and_then(|t| t.get(id)).cloned()
    }

    /// True when no type holds any record.
    pub fn is_empty(&self) -> bool {
        self.tables.values().all(BTreeMap::is_empty)
    }
}

impl Backend for MemoryBackend {
    fn iterate_records<'a>(
        &'a self,
        type_name: &str,
    ) -> BackendResult<Box<dyn Iterator<Item = BackendResult<Record>> + 'a>> {
        if self.catalog.get(type_name).is_none() {
            return Err(BackendError::new(format!("unknown record type {type_name:?}")));
        }
        match self.tables.get(type_name) {
            Some(table) => Ok(Box::new(table.values().cloned().map(Ok))),
            None => Ok(Box::new(std::iter::empty())),
        }
    }

    fn write_record(&mut self, type_name: &str, record: &Record) -> BackendResult<RecordId> {
        let ty = self
            .catalog
            .get(type_name)
            .ok_or_else(|| BackendError::new(format!("unknown record type {type_name:?}")))?;
        if record.values.len() != ty.fields().len() {
            return Err(BackendError::new(format!(
                "expected {} field values, got {}",
                ty.fields().len(),
                record.values.len()
            )));
        }

        self.writes_seen += 1;
        if let Some(limit) = self.fail_after_writes {
            if self.writes_seen > limit {
                return Err(BackendError::new("injected write failure"));
            }
        }

        let id = if self.assign_ids {
            let id = RecordId::Int(self.next_id);
            self.next_id += 1;
            id
        } else {
            record.id.clone()
        };

        let table = self.tables.entry(type_name.to_string()).or_default();
        if table.contains_key(&id) {
            return Err(BackendError::new(format!("duplicate identifier {id}")));
        }
        table.insert(id.clone(), Record { id: id.clone(), values: record.values.clone() });
        Ok(id)
    }

    fn update_reference_field(
        &mut self,
        type_name: &str,
        id: &RecordId,
        field: &str,
        value: &Value,
    ) -> BackendResult<()> {
        let ty = self
            .catalog
            .get(type_name)
            .ok_or_else(|| BackendError::new(format!("unknown record type {type_name:?}")))?;
        let index = ty
            .field_index(field)
            .ok_or_else(|| BackendError::new(format!("unknown field {field:?} on {type_name}")))?;
        if !matches!(ty.fields()[index].kind, FieldKind::Reference { .. }) {
            return Err(BackendError::new(format!("field {field:?} is not a reference")));
        }

        let record = self
            .tables
            .get_mut(type_name)
            .and_then(|t| t.get_mut(id))
            .ok_or_else(|| BackendError::new(format!("no record {type_name}[{id}]")))?;
        record.values[index] = value.clone();
        Ok(())
    }

    fn begin(&mut self) -> BackendResult<()> {
        if self.snapshot.is_some() {
            return Err(BackendError::new("transaction already active"));
        }
        self.snapshot = Some(self.tables.clone());
        Ok(())
    }

    fn commit(&mut self) -> BackendResult<()> {
        self.snapshot
            .take()
            .map(|_| ())
            .ok_or_else(|| BackendError::new("no active transaction"))
    }

    fn rollback(&mut self) -> BackendResult<()> {
        match self.snapshot.take() {
            Some(saved) => {
                self.tables = saved;
                Ok(())
            }
            None => Err(BackendError::new("no active transaction")),
        }
    }
}
