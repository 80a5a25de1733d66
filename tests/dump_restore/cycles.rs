//! Cyclic Schemas
//!
//! Reference cycles dump without infinite recursion and restore through
//! the deferred second pass: cycle-internal references are written null
//! first, then patched once every record of the component exists.

use crate::common::*;
use snapdump::prelude::*;

#[test]
fn mutual_cycle_round_trips() {
    let catalog = cyclic_catalog();
    let engine = DumpEngine::new(catalog.clone());

    let mut source = MemoryBackend::new(&catalog);
    source
        .write_record("TypeA", &Record::new(1, vec![Value::from("a"), Value::Int(1)]))
        .unwrap();
    source
        .write_record("TypeB", &Record::new(1, vec![Value::from("b"), Value::Int(1)]))
        .unwrap();

    let dump = dump_to_string(&engine, &source);
    let mut target = MemoryBackend::new(&catalog);
    let report = engine.restore(&mut target, dump.as_bytes()).unwrap();

    assert_eq!(report.records_written, 2);
    assert_eq!(report.deferred_applied, 2);
    assert_eq!(source.records("TypeA"), target.records("TypeA"));
    assert_eq!(source.records("TypeB"), target.records("TypeB"));
}

#[test]
fn cycle_members_emit_in_name_order() {
    let catalog = cyclic_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let backend = MemoryBackend::new(&catalog);

    assert_eq!(
        dump_to_string(&engine, &backend),
        "%snapdump 1\n%table TypeA\n%table TypeB\n"
    );
}

#[test]
fn self_referencing_tree_round_trips() {
    let catalog = tree_catalog();
    let engine = DumpEngine::new(catalog.clone());

    // Child sorts before its parent, so the raw stream contains a forward
    // reference that only the deferred pass can satisfy.
    let mut source = MemoryBackend::new(&catalog);
    source
        .write_record("Category", &Record::new(1, vec![Value::from("child"), Value::Int(2)]))
        .unwrap();
    source
        .write_record("Category", &Record::new(2, vec![Value::from("root"), Value::Null]))
        .unwrap();

    let dump = dump_to_string(&engine, &source);
    let mut target = MemoryBackend::new(&catalog);
    let report = engine.restore(&mut target, dump.as_bytes()).unwrap();

    assert_eq!(report.deferred_applied, 1);
    assert_eq!(source.records("Category"), target.records("Category"));
}

#[test]
fn deep_tree_round_trips() {
    let catalog = tree_catalog();
    let engine = DumpEngine::new(catalog.clone());

    let mut source = MemoryBackend::new(&catalog);
    source
        .write_record("Category", &Record::new(1, vec![Value::from("root"), Value::Null]))
        .unwrap();
    for id in 2..=10 {
        source
            .write_record(
                "Category",
                &Record::new(id, vec![Value::from(format!("node{id}")), Value::Int(id - 1)]),
            )
            .unwrap();
    }

    let dump = dump_to_string(&engine, &source);
    let mut target = MemoryBackend::new(&catalog);
    let report = engine.restore(&mut target, dump.as_bytes()).unwrap();

    assert_eq!(report.records_written, 10);
    assert_eq!(report.deferred_applied, 9);
    assert_eq!(source.records("Category"), target.records("Category"));
}

#[test]
fn dangling_deferred_reference_fails_restore() {
    let catalog = tree_catalog();
    let engine = DumpEngine::new(catalog.clone());

    // parent_id 99 never appears in the section.
    let stream = "%snapdump 1\n%table Category\n1\t\"orphan\"\t99\n";
    let mut target = MemoryBackend::new(&catalog);
    let err = engine.restore(&mut target, stream.as_bytes()).unwrap_err();

    assert!(err.is_reference(), "unexpected error: {err}");
    assert!(target.is_empty(), "failed restore must not leave records behind");
}

#[test]
fn assigned_ids_remap_deferred_references() {
    let catalog = tree_catalog();
    let engine = DumpEngine::new(catalog.clone());

    let mut source = MemoryBackend::new(&catalog);
    source
        .write_record("Category", &Record::new(50, vec![Value::from("root"), Value::Null]))
        .unwrap();
    source
        .write_record("Category", &Record::new(60, vec![Value::from("child"), Value::Int(50)]))
        .unwrap();

    let dump = dump_to_string(&engine, &source);
    let mut target = MemoryBackend::with_assigned_ids(&catalog);
    engine.restore(&mut target, dump.as_bytes()).unwrap();

    // 50 -> 1 and 60 -> 2; the deferred update must point at the new key.
    let records = target.records("Category");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], Record::new(1, vec![Value::from("root"), Value::Null]));
    assert_eq!(records[1], Record::new(2, vec![Value::from("child"), Value::Int(1)]));
}
