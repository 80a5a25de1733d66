//! Record and identifier types
//!
//! A [`Record`] is one persisted instance of a record type: a primary
//! identifier plus one value per declared field, positionally aligned with
//! the type's field list.
//!
//! [`RecordId`] carries the total order used everywhere a dump must be
//! deterministic: all integer identifiers sort numerically before all text
//! identifiers, text sorts lexically by code point.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Primary identifier of a record, unique within its record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordId {
    /// Numeric identifier (auto-increment keys)
    Int(i64),
    /// Text identifier (natural keys, UUIDs rendered as strings)
    Text(String),
}

impl RecordId {
    /// Extract an identifier from a reference field value.
    ///
    /// Returns `None` for null and for kinds that cannot name a record.
    pub fn from_value(value: &Value) -> Option<RecordId> {
        match value {
            Value::Int(i) => Some(RecordId::Int(*i)),
            Value::String(s) => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }

    /// Render this identifier as a reference field value.
    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Int(i) => Value::Int(*i),
            RecordId::Text(s) => Value::String(s.clone()),
        }
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RecordId::Int(a), RecordId::Int(b)) => a.cmp(b),
            (RecordId::Text(a), RecordId::Text(b)) => a.cmp(b),
            // Numeric identifiers sort before text identifiers
            (RecordId::Int(_), RecordId::Text(_)) => Ordering::Less,
            (RecordId::Text(_), RecordId::Int(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(i) => write!(f, "{}", i),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(i: i64) -> Self {
        RecordId::Int(i)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// One persisted instance of a record type.
///
/// `values` holds exactly one entry per field of the owning type, in
/// declared field order. Reference fields hold the target identifier as a
/// `Value::Int` / `Value::String`, or `Value::Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Primary identifier, unique within the record type
    pub id: RecordId,
    /// Field values in declared field order
    pub values: Vec<Value>,
}

impl Record {
    /// Create a record from an identifier and field values.
    pub fn new(id: impl Into<RecordId>, values: Vec<Value>) -> Self {
        Record { id: id.into(), values }
    }
}
