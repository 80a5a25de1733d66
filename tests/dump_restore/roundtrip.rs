//! Round-Trip Equivalence
//!
//! `restore(dump(D))` yields the same record set as D, per type and per
//! field, modulo backend-assigned identifiers.

use crate::common::*;
use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use snapdump::prelude::*;
use std::fs::File;
use std::io::{BufReader, Write as _};

#[test]
fn library_round_trip_preserves_records() {
    let catalog = library_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let source = seeded_library(&catalog);

    let dump = dump_to_string(&engine, &source);
    let mut target = MemoryBackend::new(&catalog);
    let report = engine.restore(&mut target, dump.as_bytes()).unwrap();

    assert_eq!(report.records_written, 2);
    assert_eq!(report.deferred_applied, 0);
    assert_eq!(source.records("Author"), target.records("Author"));
    assert_eq!(source.records("Book"), target.records("Book"));
}

#[test]
fn round_trip_dump_is_byte_identical() {
    let catalog = library_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let source = seeded_library(&catalog);

    let dump = dump_to_string(&engine, &source);
    let mut target = MemoryBackend::new(&catalog);
    engine.restore(&mut target, dump.as_bytes()).unwrap();

    assert_eq!(dump, dump_to_string(&engine, &target));
}

#[test]
fn all_scalar_kinds_round_trip() {
    let catalog = scalars_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let mut source = MemoryBackend::new(&catalog);
    source
        .write_record(
            "Sample",
            &Record::new(
                1,
                vec![
                    Value::Bool(false),
                    Value::Int(i64::MIN),
                    Value::Float(-0.0),
                    Value::from("line1\nline2 \"quoted\""),
                    Value::Bytes((0u8..=255).collect()),
                    Value::Date(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()),
                    Value::DateTime(Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap()),
                ],
            ),
        )
        .unwrap();
    source
        .write_record("Sample", &Record::new(2, vec![Value::Null; 7]))
        .unwrap();

    let dump = dump_to_string(&engine, &source);
    let mut target = MemoryBackend::new(&catalog);
    engine.restore(&mut target, dump.as_bytes()).unwrap();

    assert_eq!(source.records("Sample"), target.records("Sample"));
}

#[test]
fn round_trip_through_a_file() {
    let catalog = library_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let source = seeded_library(&catalog);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dump");
    {
        let mut file = File::create(&path).unwrap();
        engine.dump(&source, &mut file).unwrap();
        file.flush().unwrap();
    }

    let mut target = MemoryBackend::new(&catalog);
    engine
        .restore(&mut target, BufReader::new(File::open(&path).unwrap()))
        .unwrap();

    assert_eq!(source.records("Author"), target.records("Author"));
    assert_eq!(source.records("Book"), target.records("Book"));
}

#[test]
fn assigned_id_backend_remaps_references() {
    let catalog = library_catalog();
    let engine = DumpEngine::new(catalog.clone());

    // Dump-side identifiers deliberately far from auto-increment values.
    let mut source = MemoryBackend::new(&catalog);
    source
        .write_record("Author", &Record::new(10, vec![Value::from("Ada")]))
        .unwrap();
    source
        .write_record("Author", &Record::new(20, vec![Value::from("Brian")]))
        .unwrap();
    source
        .write_record("Book", &Record::new(30, vec![Value::from("Notes"), Value::Int(20)]))
        .unwrap();

    let dump = dump_to_string(&engine, &source);
    let mut target = MemoryBackend::with_assigned_ids(&catalog);
    let report = engine.restore(&mut target, dump.as_bytes()).unwrap();
    assert_eq!(report.records_written, 3);

    // Authors arrive in id order: 10 -> 1, 20 -> 2; the book follows as 3.
    let authors = target.records("Author");
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0], Record::new(1, vec![Value::from("Ada")]));
    assert_eq!(authors[1], Record::new(2, vec![Value::from("Brian")]));

    // The reference tracked its author through the remapping.
    let books = target.records("Book");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].values[1], Value::Int(2));
}

#[test]
fn restore_report_counts_per_table() {
    let catalog = library_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let source = seeded_library(&catalog);

    let dump = dump_to_string(&engine, &source);
    let mut target = MemoryBackend::new(&catalog);
    let report = engine.restore(&mut target, dump.as_bytes()).unwrap();

    assert_eq!(report.tables.get("Author"), Some(&1));
    assert_eq!(report.tables.get("Book"), Some(&1));
    assert!(report.summary().contains("2 records"));
}

proptest! {
    #[test]
    fn prop_scalar_rows_round_trip(
        flag in any::<bool>(),
        count in any::<i64>(),
        ratio in -1e300f64..1e300,
        label in ".*",
    ) {
        let catalog = scalars_catalog();
        let engine = DumpEngine::new(catalog.clone());
        let mut source = MemoryBackend::new(&catalog);
        source
            .write_record(
                "Sample",
                &Record::new(
                    1,
                    vec![
                        Value::Bool(flag),
                        Value::Int(count),
                        Value::Float(ratio),
                        Value::String(label),
                        Value::Null,
                        Value::Null,
                        Value::Null,
                    ],
                ),
            )
            .unwrap();

        let dump = dump_to_string(&engine, &source);
        let mut target = MemoryBackend::new(&catalog);
        engine.restore(&mut target, dump.as_bytes()).unwrap();

        prop_assert_eq!(source.records("Sample"), target.records("Sample"));
    }
}
