//! JSON Schema fragments for type descriptors.

use crate::types::{FieldDescriptor, TypeDescriptor};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Dialect written into every standalone model document.
pub const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// Where `$ref`s to records point.
pub const LOCAL_DEFS: &str = "#/$defs/";

/// Accumulates record definitions while descriptors are converted.
///
/// Each record is converted once; a record that refers to itself sees its
/// own placeholder entry and emits a plain `$ref`.
#[derive(Debug)]
pub struct SchemaWriter {
    ref_prefix: String,
    defs: BTreeMap<String, Value>,
}

impl SchemaWriter {
    pub fn new(ref_prefix: impl Into<String>) -> Self {
        Self {
            ref_prefix: ref_prefix.into(),
            defs: BTreeMap::new(),
        }
    }

    /// Schema for a single type.
    pub fn type_schema(&mut self, ty: &TypeDescriptor) -> Value {
        match ty {
            TypeDescriptor::Integer => json!({ "type": "integer" }),
            TypeDescriptor::Float => json!({ "type": "number" }),
            TypeDescriptor::String => json!({ "type": "string" }),
            TypeDescriptor::Boolean => json!({ "type": "boolean" }),
            TypeDescriptor::Sequence(element) => {
                json!({ "type": "array", "items": self.type_schema(element) })
            }
            TypeDescriptor::Set(element) => json!({
                "type": "array",
                "items": self.type_schema(element),
                "uniqueItems": true
            }),
            TypeDescriptor::Tuple(items) => {
                let prefix: Vec<Value> = items.iter().map(|t| self.type_schema(t)).collect();
                json!({
                    "type": "array",
                    "prefixItems": prefix,
                    "minItems": items.len(),
                    "maxItems": items.len()
                })
            }
            TypeDescriptor::Mapping(key, value) => {
                let mut schema = json!({
                    "type": "object",
                    "additionalProperties": self.type_schema(value)
                });
                if matches!(**key, TypeDescriptor::Integer) {
                    schema["propertyNames"] = json!({ "pattern": "^-?[0-9]+$" });
                }
                schema
            }
            TypeDescriptor::Optional(inner) => json!({
                "anyOf": [self.type_schema(inner), { "type": "null" }]
            }),
            TypeDescriptor::Record(record) => {
                let key = record.key();
                if !self.defs.contains_key(&key) {
                    self.defs.insert(key.clone(), Value::Null);
                    let body = self.object_schema(Some(record.name()), &record.fields());
                    self.defs.insert(key.clone(), body);
                }
                json!({ "$ref": format!("{}{}", self.ref_prefix, key) })
            }
            TypeDescriptor::Any | TypeDescriptor::Unit => json!({}),
        }
    }

    /// Object schema with one property per field. Unknown keys are allowed.
    pub fn object_schema(&mut self, title: Option<&str>, fields: &[FieldDescriptor]) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in fields {
            properties.insert(field.name.clone(), self.type_schema(&field.ty));
            if field.required {
                required.push(Value::String(field.name.clone()));
            }
        }
        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        if let Some(title) = title {
            schema.insert("title".into(), json!(title));
        }
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), Value::Array(required));
        Value::Object(schema)
    }

    /// Record definitions collected so far, keyed by [`RecordDescriptor::key`](crate::types::RecordDescriptor::key).
    pub fn into_definitions(self) -> BTreeMap<String, Value> {
        self.defs
    }
}

/// Standalone document for a model: the object schema plus `$schema` and
/// any record definitions under `$defs`.
pub fn model_document(title: &str, fields: &[FieldDescriptor]) -> Value {
    let mut writer = SchemaWriter::new(LOCAL_DEFS);
    let mut document = writer.object_schema(Some(title), fields);
    let defs = writer.into_definitions();
    if let Value::Object(map) = &mut document {
        map.insert("$schema".into(), json!(DRAFT_2020_12));
        if !defs.is_empty() {
            map.insert("$defs".into(), Value::Object(defs.into_iter().collect()));
        }
    }
    document
}
