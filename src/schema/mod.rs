//! # Schema Module
//!
//! Synthesizes JSON-Schema backed models from function signatures.
//!
//! An input model has one required field per parameter; an output model
//! wraps the return value in a single `result` field, unless the function
//! already returns a [`Record`](crate::Record), in which case the record's
//! schema is used unchanged. Models are compiled once with `jsonschema` and
//! shared by every request to the endpoint.

mod json;
mod model;

pub use json::{model_document, SchemaWriter, DRAFT_2020_12, LOCAL_DEFS};
pub use model::{
    generate_input_model, generate_output_model, GeneratedSchema, ModelOrigin, ValidationError,
    UNPROCESSABLE_ENTITY,
};
