//! Integrity Verification
//!
//! `verify` diffs a dump stream against the backend's live state and
//! reports discrepancies instead of failing.

use crate::common::*;
use snapdump::prelude::*;

#[test]
fn fresh_restore_verifies_clean() {
    let catalog = library_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let dump = dump_to_string(&engine, &seeded_library(&catalog));

    let mut target = MemoryBackend::new(&catalog);
    engine.restore(&mut target, dump.as_bytes()).unwrap();

    let discrepancies = engine.verify(&target, dump.as_bytes()).unwrap();
    assert!(discrepancies.is_empty(), "unexpected: {discrepancies:?}");
}

#[test]
fn empty_dump_against_empty_backend_verifies_clean() {
    let catalog = library_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let backend = MemoryBackend::new(&catalog);
    let dump = dump_to_string(&engine, &backend);

    assert!(engine.verify(&backend, dump.as_bytes()).unwrap().is_empty());
}

#[test]
fn missing_record_is_reported() {
    let catalog = library_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let dump = dump_to_string(&engine, &seeded_library(&catalog));

    // The backend never receives the Book.
    let mut target = MemoryBackend::new(&catalog);
    target
        .write_record("Author", &Record::new(1, vec![Value::from("Ada")]))
        .unwrap();

    let discrepancies = engine.verify(&target, dump.as_bytes()).unwrap();
    assert_eq!(
        discrepancies,
        vec![
            Discrepancy::CountMismatch { type_name: "Book".into(), dump: 1, backend: 0 },
            Discrepancy::MissingInBackend { type_name: "Book".into(), id: RecordId::Int(1) },
        ]
    );
}

#[test]
fn extra_record_is_reported() {
    let catalog = library_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let mut backend = seeded_library(&catalog);
    let dump = dump_to_string(&engine, &backend);

    backend
        .write_record("Author", &Record::new(2, vec![Value::from("Interloper")]))
        .unwrap();

    let discrepancies = engine.verify(&backend, dump.as_bytes()).unwrap();
    assert_eq!(
        discrepancies,
        vec![
            Discrepancy::CountMismatch { type_name: "Author".into(), dump: 1, backend: 2 },
            Discrepancy::UnexpectedInBackend { type_name: "Author".into(), id: RecordId::Int(2) },
        ]
    );
}

#[test]
fn swapped_identifier_reports_both_sides() {
    let catalog = library_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let dump = dump_to_string(&engine, &seeded_library(&catalog));

    // Same count, different identifier.
    let mut target = MemoryBackend::new(&catalog);
    target
        .write_record("Author", &Record::new(9, vec![Value::from("Ada")]))
        .unwrap();
    target
        .write_record("Book", &Record::new(1, vec![Value::from("Notes"), Value::Int(9)]))
        .unwrap();

    let discrepancies = engine.verify(&target, dump.as_bytes()).unwrap();
    assert_eq!(
        discrepancies,
        vec![
            Discrepancy::MissingInBackend { type_name: "Author".into(), id: RecordId::Int(1) },
            Discrepancy::UnexpectedInBackend { type_name: "Author".into(), id: RecordId::Int(9) },
        ]
    );
}

#[test]
fn malformed_stream_is_an_error_not_a_discrepancy() {
    let catalog = library_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let backend = MemoryBackend::new(&catalog);

    let err = engine.verify(&backend, "no header here\n".as_bytes()).unwrap_err();
    assert!(err.is_parse(), "unexpected error: {err}");
}

#[test]
fn discrepancies_display_readably() {
    let missing = Discrepancy::MissingInBackend { type_name: "Author".into(), id: RecordId::Int(7) };
    assert_eq!(missing.to_string(), "Author[7] is in the dump but not in the backend");

    let counts = Discrepancy::CountMismatch { type_name: "Book".into(), dump: 3, backend: 1 };
    assert_eq!(counts.to_string(), "Book: dump has 3 records, backend has 1");
}
