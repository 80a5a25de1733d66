//! Strict Parsing
//!
//! Restore fails fast with a 1-based line number on any deviation from
//! the dump grammar; nothing is silently skipped or coerced.

use crate::common::*;
use snapdump::prelude::*;

fn restore_err(stream: &str) -> Error {
    let catalog = library_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let mut target = MemoryBackend::new(&catalog);
    let err = engine.restore(&mut target, stream.as_bytes()).unwrap_err();
    assert!(target.is_empty());
    err
}

// ====== Header ======

#[test]
fn empty_stream_is_rejected() {
    let err = restore_err("");
    assert!(err.is_parse());
    assert!(err.to_string().contains("line 1"), "got: {err}");
}

#[test]
fn missing_header_is_rejected() {
    let err = restore_err("%table Author\n1\t\"Ada\"\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("expected header"), "got: {err}");
}

#[test]
fn malformed_header_is_rejected() {
    let err = restore_err("%snapdump one\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("invalid header"), "got: {err}");
}

#[test]
fn unsupported_version_is_rejected() {
    let err = restore_err("%snapdump 99\n%table Author\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("unsupported format version 99"), "got: {err}");
}

#[test]
fn duplicate_header_is_rejected() {
    let err = restore_err("%snapdump 1\n%snapdump 1\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("line 2"), "got: {err}");
}

// ====== Structure ======

#[test]
fn unknown_table_is_rejected() {
    let err = restore_err("%snapdump 1\n%table Publisher\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("Publisher"), "got: {err}");
}

#[test]
fn duplicate_table_section_is_rejected() {
    let err = restore_err("%snapdump 1\n%table Author\n%table Book\n%table Author\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("line 4"), "got: {err}");
}

#[test]
fn row_before_any_section_is_rejected() {
    let err = restore_err("%snapdump 1\n1\t\"Ada\"\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("row before any %table section"), "got: {err}");
}

#[test]
fn unknown_marker_is_rejected() {
    let err = restore_err("%snapdump 1\n%comment hello\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("unknown marker"), "got: {err}");
}

#[test]
fn blank_line_is_rejected() {
    let err = restore_err("%snapdump 1\n%table Author\n\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("line 3"), "got: {err}");
}

// ====== Rows ======

#[test]
fn field_count_mismatch_is_rejected() {
    // Author rows carry exactly two tokens: id and name.
    let err = restore_err("%snapdump 1\n%table Author\n1\t\"Ada\"\t\"extra\"\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("expected 2 tokens, got 3"), "got: {err}");
}

#[test]
fn malformed_token_is_rejected() {
    let err = restore_err("%snapdump 1\n%table Author\n1\tAda\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("line 3"), "got: {err}");
}

#[test]
fn unterminated_string_is_rejected() {
    let err = restore_err("%snapdump 1\n%table Author\n1\t\"Ada\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("invalid string token"), "got: {err}");
}

#[test]
fn duplicate_row_identifier_is_rejected() {
    let err = restore_err("%snapdump 1\n%table Author\n1\t\"Ada\"\n1\t\"Again\"\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("line 4"), "got: {err}");
    assert!(err.to_string().contains("duplicate identifier"), "got: {err}");
}

#[test]
fn null_in_non_nullable_field_is_rejected() {
    let err = restore_err("%snapdump 1\n%table Author\n1\tnull\n");
    assert!(err.is_parse());
    assert!(err.to_string().contains("non-nullable field \"name\""), "got: {err}");
}

#[test]
fn null_in_non_nullable_reference_is_rejected() {
    let err = restore_err(
        "%snapdump 1\n%table Author\n1\t\"Ada\"\n%table Book\n1\t\"Notes\"\tnull\n",
    );
    assert!(err.is_parse());
    assert!(err.to_string().contains("non-nullable field \"author_id\""), "got: {err}");
}

#[test]
fn non_deferred_dangling_reference_is_rejected() {
    // author_id 7 was never listed in the Author section.
    let catalog = library_catalog();
    let engine = DumpEngine::new(catalog.clone());
    let mut target = MemoryBackend::new(&catalog);
    let stream = "%snapdump 1\n%table Author\n1\t\"Ada\"\n%table Book\n1\t\"Notes\"\t7\n";

    let err = engine.restore(&mut target, stream.as_bytes()).unwrap_err();
    assert!(err.is_reference(), "unexpected error: {err}");
    assert!(err.to_string().contains("Book"), "got: {err}");
    assert!(target.is_empty());
}

#[test]
fn error_messages_use_one_based_line_numbers() {
    let err = restore_err("%snapdump 1\n%table Author\nbad id\t\"Ada\"\n");
    assert!(err.to_string().contains("line 3"), "got: {err}");
}
