//! Schema catalog: record types, fields, and reference metadata
//!
//! The catalog is the engine's only source of schema knowledge. It is built
//! once per run from descriptor structs, validated at build time, and passed
//! by reference into the dump writer and restore loader. There is no global
//! "current schema".
//!
//! Declaration order is preserved: `types()` yields record types in
//! registration order and each type's `fields()` in declaration order. The
//! dependency resolver, not the catalog, decides emission order.

use crate::error::SchemaError;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The scalar kinds a field may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarKind {
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit IEEE-754 float
    Float,
    /// UTF-8 string
    String,
    /// Binary data
    Bytes,
    /// Calendar date
    Date,
    /// UTC instant
    DateTime,
}

impl ScalarKind {
    /// Kind name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Bool => "Bool",
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::String => "String",
            ScalarKind::Bytes => "Bytes",
            ScalarKind::Date => "Date",
            ScalarKind::DateTime => "DateTime",
        }
    }

    /// Check whether a non-null value inhabits this kind.
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ScalarKind::Bool, Value::Bool(_))
                | (ScalarKind::Int, Value::Int(_))
                | (ScalarKind::Float, Value::Float(_))
                | (ScalarKind::String, Value::String(_))
                | (ScalarKind::Bytes, Value::Bytes(_))
                | (ScalarKind::Date, Value::Date(_))
                | (ScalarKind::DateTime, Value::DateTime(_))
        )
    }
}

/// What a field holds: a scalar, or a reference to another record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Scalar value of the given kind
    Scalar(ScalarKind),
    /// Reference to exactly one other record type
    Reference {
        /// Name of the referenced record type
        target: String,
    },
}

/// Descriptor for one field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within its record type
    pub name: String,
    /// Scalar kind or reference target
    pub kind: FieldKind,
    /// Whether null is a legal value
    pub nullable: bool,
}

impl FieldDescriptor {
    /// Required scalar field.
    pub fn scalar(name: impl Into<String>, kind: ScalarKind) -> Self {
        FieldDescriptor {
            name: name.into(),
            kind: FieldKind::Scalar(kind),
            nullable: false,
        }
    }

    /// Required reference field.
    pub fn reference(name: impl Into<String>, target: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            kind: FieldKind::Reference { target: target.into() },
            nullable: false,
        }
    }

    /// Mark this field as accepting null.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Reference target, if this is a reference field.
    pub fn reference_target(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Reference { target } => Some(target),
            FieldKind::Scalar(_) => None,
        }
    }
}

/// A named schema entity with an ordered list of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl RecordType {
    /// Create a record type with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        RecordType { name: name.into(), fields: Vec::new() }
    }

    /// Append a field (builder style, declaration order).
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Index of a field by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Immutable catalog of all record types for one dump/restore run.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    types: Vec<RecordType>,
    index: HashMap<String, usize>,
}

impl SchemaCatalog {
    /// Start building a catalog.
    pub fn builder() -> SchemaCatalogBuilder {
        SchemaCatalogBuilder { types: Vec::new() }
    }

    /// Record types in registration order.
    pub fn types(&self) -> &[RecordType] {
        &self.types
    }

    /// Look up a record type by name.
    pub fn get(&self, name: &str) -> Option<&RecordType> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    /// Number of record types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if the catalog has no record types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Builder for [`SchemaCatalog`]; validation happens in [`build`].
///
/// [`build`]: SchemaCatalogBuilder::build
#[derive(Debug)]
pub struct SchemaCatalogBuilder {
    types: Vec<RecordType>,
}

impl SchemaCatalogBuilder {
    /// Register a record type. Registration order is preserved.
    pub fn register(mut self, record_type: RecordType) -> Self {
        self.types.push(record_type);
        self
    }

    /// Validate and freeze the catalog.
    ///
    /// Fails on an empty type name, a duplicate type name, a duplicate field
    /// name within a type, or a reference to an unregistered type.
    pub fn build(self) -> Result<SchemaCatalog, SchemaError> {
        let mut index = HashMap::new();
        for (i, ty) in self.types.iter().enumerate() {
            if ty.name().is_empty() {
                return Err(SchemaError::EmptyTypeName);
            }
            if index.insert(ty.name().to_string(), i).is_some() {
                return Err(SchemaError::DuplicateType { type_name: ty.name().to_string() });
            }
        }

        for ty in &self.types {
            let mut seen = HashMap::new();
            for field in ty.fields() {
                if seen.insert(field.name.as_str(), ()).is_some() {
                    return Err(SchemaError::DuplicateField {
                        type_name: ty.name().to_string(),
                        field: field.name.clone(),
                    });
                }
                if let Some(target) = field.reference_target() {
                    if !index.contains_key(target) {
                        return Err(SchemaError::UnknownReferenceTarget {
                            type_name: ty.name().to_string(),
                            field: field.name.clone(),
                            target: target.to_string(),
                        });
                    }
                }
            }
        }

        Ok(SchemaCatalog { types: self.types, index })
    }
}
