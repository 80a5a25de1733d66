//! Strict line and token decoding
//!
//! The parser accepts exactly the canonical forms the encoder produces.
//! Token interpretation is schema-driven: the caller supplies the field
//! descriptor, and the declared kind selects how the token is read.
//! Anything else is a [`ParseError`].

use crate::error::ParseError;
use crate::{MARKER, NULL_TOKEN, SEPARATOR};
use base64::Engine;
use chrono::{DateTime, NaiveDate, Utc};
use snapdump_core::{FieldDescriptor, FieldKind, RecordId, ScalarKind, Value};

/// One classified line of a dump stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Format header (`%snapdump <version>`)
    Header {
        /// Declared format version
        version: u32,
    },
    /// Section marker (`%table <Name>`)
    Table(String),
    /// Record row, split into raw tokens
    Row(Vec<String>),
}

/// Classify one line of a dump stream.
///
/// Rows come back as raw tokens; decode them against the current table's
/// fields with [`decode_field`] and [`decode_id`].
pub fn parse_line(line: &str) -> Result<Line, ParseError> {
    if line.is_empty() {
        return Err(ParseError::EmptyLine);
    }

    if line.starts_with(MARKER) {
        if let Some(rest) = line.strip_prefix("%snapdump ") {
            let version = rest
                .parse::<u32>()
                .map_err(|_| ParseError::InvalidHeader(line.to_string()))?;
            return Ok(Line::Header { version });
        }
        if let Some(name) = line.strip_prefix("%table ") {
            if name.is_empty() {
                return Err(ParseError::EmptyTableName);
            }
            return Ok(Line::Table(name.to_string()));
        }
        return Err(ParseError::UnknownMarker(line.to_string()));
    }

    // String tokens escape every control character, so a raw TAB is always
    // a separator.
    Ok(Line::Row(line.split(SEPARATOR).map(str::to_string).collect()))
}

/// Decode a record identifier token: bare integer or quoted text.
pub fn decode_id(token: &str) -> Result<RecordId, ParseError> {
    if token.starts_with('"') {
        return Ok(RecordId::Text(parse_quoted(token)?));
    }
    token
        .parse::<i64>()
        .map(RecordId::Int)
        .map_err(|_| ParseError::InvalidIdentifier(token.to_string()))
}

/// Decode one field token against its descriptor.
pub fn decode_field(field: &FieldDescriptor, token: &str) -> Result<Value, ParseError> {
    if token == NULL_TOKEN {
        return if field.nullable {
            Ok(Value::Null)
        } else {
            Err(ParseError::NullNotAllowed { field: field.name.clone() })
        };
    }

    match &field.kind {
        FieldKind::Reference { .. } => Ok(decode_id(token)?.to_value()),
        FieldKind::Scalar(kind) => decode_scalar(*kind, token),
    }
}

/// Decode a non-null scalar token of the given kind.
pub fn decode_scalar(kind: ScalarKind, token: &str) -> Result<Value, ParseError> {
    match kind {
        ScalarKind::Bool => match token {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(ParseError::InvalidBool(token.to_string())),
        },
        ScalarKind::Int => token
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ParseError::InvalidInt(token.to_string())),
        ScalarKind::Float => decode_float(token),
        ScalarKind::String => parse_quoted(token).map(Value::String),
        ScalarKind::Bytes => decode_bytes(token),
        ScalarKind::Date => NaiveDate::parse_from_str(token, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| ParseError::InvalidDate(token.to_string())),
        ScalarKind::DateTime => DateTime::parse_from_rfc3339(token)
            .map(|t| Value::DateTime(t.with_timezone(&Utc)))
            .map_err(|_| ParseError::InvalidDateTime(token.to_string())),
    }
}

fn decode_float(token: &str) -> Result<Value, ParseError> {
    match token {
        "NaN" => return Ok(Value::Float(f64::NAN)),
        "+Inf" => return Ok(Value::Float(f64::INFINITY)),
        "-Inf" => return Ok(Value::Float(f64::NEG_INFINITY)),
        _ => {}
    }
    let f = token
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidFloat(token.to_string()))?;
    // f64::from_str also accepts "inf"/"nan" spellings; only the canonical
    // bare tokens above may name a non-finite value.
    if !f.is_finite() {
        return Err(ParseError::InvalidFloat(token.to_string()));
    }
    Ok(Value::Float(f))
}

fn decode_bytes(token: &str) -> Result<Value, ParseError> {
    let b64 = token
        .strip_prefix('$')
        .ok_or_else(|| ParseError::InvalidBase64(format!("missing $ prefix in {token:?}")))?;
    base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map(Value::Bytes)
        .map_err(|e| ParseError::InvalidBase64(e.to_string()))
}

/// Parse a quoted string token, consuming it fully.
fn parse_quoted(token: &str) -> Result<String, ParseError> {
    let mut chars = token.chars();
    if chars.next() != Some('"') {
        return Err(ParseError::InvalidString(format!("missing opening quote in {token:?}")));
    }

    let mut result = String::new();
    loop {
        match chars.next() {
            None => {
                return Err(ParseError::InvalidString(format!(
                    "missing closing quote in {token:?}"
                )))
            }
            Some('"') => break,
            Some('\\') => match chars.next() {
                Some('"') => result.push('"'),
                Some('\\') => result.push('\\'),
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('u') => {
                    let hex: String = chars.by_ref().take(4).collect();
                    if hex.len() != 4 {
                        return Err(ParseError::InvalidString("truncated unicode escape".to_string()));
                    }
                    let code = u32::from_str_radix(&hex, 16).map_err(|_| {
                        ParseError::InvalidString(format!("invalid unicode escape \\u{hex}"))
                    })?;
                    match char::from_u32(code) {
                        Some(c) => result.push(c),
                        None => {
                            return Err(ParseError::InvalidString(format!(
                                "invalid unicode codepoint \\u{hex}"
                            )))
                        }
                    }
                }
                Some(c) => {
                    return Err(ParseError::InvalidString(format!("invalid escape \\{c}")))
                }
                None => {
                    return Err(ParseError::InvalidString("trailing backslash".to_string()))
                }
            },
            Some(c) => result.push(c),
        }
    }

    if chars.next().is_some() {
        return Err(ParseError::InvalidString(format!(
            "trailing characters after closing quote in {token:?}"
        )));
    }
    Ok(result)
}
