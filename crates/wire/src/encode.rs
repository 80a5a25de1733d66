//! Canonical token emission
//!
//! One fixed representation per scalar kind. Nothing here consults the
//! clock, the locale, or any iteration order, so encoding the same value
//! always yields the same bytes.

use crate::error::EncodeError;
use crate::{MARKER, NULL_TOKEN, SEPARATOR};
use base64::Engine;
use chrono::SecondsFormat;
use snapdump_core::{FieldDescriptor, FieldKind, RecordId, ScalarKind, Value};

/// Encode a `%table` section line.
pub fn table_line(type_name: &str) -> String {
    format!("{}table {}", MARKER, type_name)
}

/// Join already-encoded tokens into a row line.
pub fn encode_row(tokens: &[String]) -> String {
    let mut row = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            row.push(SEPARATOR);
        }
        row.push_str(token);
    }
    row
}

/// Encode a record identifier token.
///
/// Integers stay bare; text identifiers are quoted like strings, so an
/// identifier token is never ambiguous with a numeric one.
pub fn encode_id(id: &RecordId) -> String {
    match id {
        RecordId::Int(i) => i.to_string(),
        RecordId::Text(s) => encode_string(s),
    }
}

/// Encode one field value against its descriptor.
///
/// Fails if the value kind does not inhabit the declared kind, or on null
/// in a non-nullable field.
pub fn encode_field(field: &FieldDescriptor, value: &Value) -> Result<String, EncodeError> {
    if value.is_null() {
        return if field.nullable {
            Ok(NULL_TOKEN.to_string())
        } else {
            Err(EncodeError::UnexpectedNull)
        };
    }

    match &field.kind {
        FieldKind::Reference { .. } => match RecordId::from_value(value) {
            Some(id) => Ok(encode_id(&id)),
            None => Err(EncodeError::KindMismatch {
                expected: "reference identifier",
                actual: value.kind_name(),
            }),
        },
        FieldKind::Scalar(kind) => encode_scalar(*kind, value),
    }
}

/// Encode a non-null scalar value of the given kind.
pub fn encode_scalar(kind: ScalarKind, value: &Value) -> Result<String, EncodeError> {
    if !kind.matches(value) {
        return Err(EncodeError::KindMismatch {
            expected: kind.name(),
            actual: value.kind_name(),
        });
    }

    Ok(match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => encode_float(*f),
        Value::String(s) => encode_string(s),
        Value::Bytes(b) => encode_bytes(b),
        Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        Value::DateTime(t) => t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        Value::Null => unreachable!("null handled by encode_field"),
    })
}

/// Encode a float, with bare tokens for the special values
fn encode_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "+Inf".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format_normal_float(f)
    }
}

/// Format a finite float, ensuring it has a decimal point
fn format_normal_float(f: f64) -> String {
    let s = f.to_string();
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{}.0", s)
    }
}

/// Encode a string token with quoting and escaping.
///
/// Every control character is escaped, so the TAB separator and the newline
/// terminator can never appear raw inside a token.
pub fn encode_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Encode bytes as a `$`-prefixed standard base64 token
fn encode_bytes(bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("${}", b64)
}
