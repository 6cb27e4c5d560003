use super::json::model_document;
use crate::callable::Callable;
use crate::error::CompileError;
use crate::types::{validate_callable, FieldDescriptor, TypeDescriptor};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use ulid::Ulid;

/// HTTP status reported for a request whose input does not fit its model.
pub const UNPROCESSABLE_ENTITY: u16 = 422;

/// How a model came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelOrigin {
    /// Built from a function's parameters or wrapped around its return type
    Synthesized,
    /// The function already returns a record; its schema is reused as-is
    Passthrough,
}

/// A synthesized, validated record type.
///
/// Each synthesis gets a fresh id, so two models for the same function are
/// distinct values that are nevertheless [`structurally_eq`](Self::structurally_eq).
#[derive(Clone)]
pub struct GeneratedSchema {
    inner: Arc<SchemaInner>,
}

struct SchemaInner {
    id: Ulid,
    name: String,
    origin: ModelOrigin,
    fields: Vec<FieldDescriptor>,
    document: Value,
    validator: jsonschema::Validator,
}

impl GeneratedSchema {
    fn compile(
        name: String,
        origin: ModelOrigin,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self, CompileError> {
        let document = model_document(&name, &fields);
        let validator = jsonschema::validator_for(&document).map_err(|err| CompileError::Schema {
            model: name.clone(),
            reason: err.to_string(),
        })?;
        let id = Ulid::new();
        debug!(model = %name, %id, fields = fields.len(), "Schema compiled");
        Ok(Self {
            inner: Arc::new(SchemaInner {
                id,
                name,
                origin,
                fields,
                document,
                validator,
            }),
        })
    }

    #[must_use]
    pub fn id(&self) -> Ulid {
        self.inner.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn origin(&self) -> ModelOrigin {
        self.inner.origin
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.inner.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.inner.fields.iter().find(|f| f.name == name)
    }

    /// The JSON Schema (draft 2020-12) document backing this model.
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.inner.document
    }

    /// Check `instance` against the model.
    ///
    /// # Errors
    ///
    /// Every schema violation, rendered as text.
    pub fn validate(&self, instance: &Value) -> Result<(), ValidationError> {
        if self.inner.validator.is_valid(instance) {
            return Ok(());
        }
        let errors = self
            .inner
            .validator
            .iter_errors(instance)
            .map(|err| err.to_string())
            .collect();
        Err(ValidationError {
            schema: self.inner.name.clone(),
            status: UNPROCESSABLE_ENTITY,
            errors,
        })
    }

    /// Build a model instance from `value`, rejecting anything that does
    /// not have the model's shape.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn instantiate(&self, value: Value) -> Result<Value, ValidationError> {
        self.validate(&value)?;
        Ok(value)
    }

    /// Same name, origin, fields and document; ids are ignored.
    #[must_use]
    pub fn structurally_eq(&self, other: &GeneratedSchema) -> bool {
        self.inner.name == other.inner.name
            && self.inner.origin == other.inner.origin
            && self.inner.fields == other.inner.fields
            && self.inner.document == other.inner.document
    }
}

impl fmt::Debug for GeneratedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedSchema")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("origin", &self.inner.origin)
            .field("fields", &self.inner.fields)
            .finish_non_exhaustive()
    }
}

/// A value that does not fit a generated model.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub schema: String,
    pub status: u16,
    pub errors: Vec<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid data for '{}'", self.schema)?;
        if !self.errors.is_empty() {
            write!(f, ": {}", self.errors.join("; "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Synthesize `"InputModel - <name>"` with one required field per parameter.
///
/// # Errors
///
/// Any [`CompileError`] from validating the callable.
pub fn generate_input_model(callable: &Callable, name: &str) -> Result<GeneratedSchema, CompileError> {
    validate_callable(callable)?;
    let fields = callable
        .signature()
        .parameters
        .iter()
        .map(|p| {
            let ty = p.annotation.clone().unwrap_or(TypeDescriptor::Any);
            FieldDescriptor {
                name: p.name.clone(),
                ty,
                required: true,
            }
        })
        .collect();
    GeneratedSchema::compile(format!("InputModel - {name}"), ModelOrigin::Synthesized, fields)
}

/// Synthesize the output model of a callable.
///
/// A record return type is reused unmodified; anything else is wrapped as
/// `"OutputModel - <name>"` with a single required `result` field.
///
/// # Errors
///
/// Any [`CompileError`] from validating the callable.
pub fn generate_output_model(callable: &Callable, name: &str) -> Result<GeneratedSchema, CompileError> {
    validate_callable(callable)?;
    let returns = callable
        .signature()
        .returns
        .clone()
        .ok_or(CompileError::InvalidReturnType(None))?;
    match returns.as_record() {
        Some(record) => GeneratedSchema::compile(
            record.name().to_string(),
            ModelOrigin::Passthrough,
            record.fields(),
        ),
        None => GeneratedSchema::compile(
            format!("OutputModel - {name}"),
            ModelOrigin::Synthesized,
            vec![FieldDescriptor {
                name: "result".to_string(),
                ty: returns,
                required: true,
            }],
        ),
    }
}
