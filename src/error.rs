//! Registration-time errors.
//!
//! Everything in here is a programmer error: it is raised while endpoints are
//! being compiled and registered, and it is expected to abort startup. Errors
//! that happen while serving a request never use these types; they are turned
//! into response envelopes by [`Api::handle`](crate::Api::handle).

use crate::api::ApiMethod;
use crate::types::TypeDescriptor;
use std::fmt;

/// A function cannot be compiled into an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The number of parameter names does not match the function's arity
    ArityMismatch { expected: usize, named: usize },
    /// Two parameters share a name
    DuplicateParameter(String),
    /// Parameters without a declared type
    MissingAnnotation(Vec<String>),
    /// A parameter's type (or a nested element type) is not eligible
    InvalidType {
        parameter: String,
        ty: TypeDescriptor,
    },
    /// The return type is absent or not eligible
    InvalidReturnType(Option<TypeDescriptor>),
    /// The synthesized JSON Schema could not be compiled
    Schema { model: String, reason: String },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::ArityMismatch { expected, named } => write!(
                f,
                "Unable to generate data model: function takes {expected} argument(s) but {named} parameter name(s) were given"
            ),
            CompileError::DuplicateParameter(name) => write!(
                f,
                "Unable to generate data model: parameter '{name}' is declared more than once"
            ),
            CompileError::MissingAnnotation(names) => write!(
                f,
                "Unable to generate data model: missing annotations for {names:?}"
            ),
            CompileError::InvalidType { parameter, ty } => write!(
                f,
                "Unable to generate data model: argument {parameter} has invalid type {ty}"
            ),
            CompileError::InvalidReturnType(Some(ty)) => write!(
                f,
                "Unable to generate data model: return type {ty} is invalid"
            ),
            CompileError::InvalidReturnType(None) => write!(
                f,
                "Unable to generate data model: return type is missing"
            ),
            CompileError::Schema { model, reason } => write!(
                f,
                "Unable to compile schema for '{model}': {reason}"
            ),
        }
    }
}

impl std::error::Error for CompileError {}

/// An endpoint cannot be added to an [`Api`](crate::Api).
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationError {
    Compile(CompileError),
    DuplicateName(String),
    RouteConflict { method: ApiMethod, path: String },
    InvalidPath(String),
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::Compile(err) => write!(f, "{err}"),
            RegistrationError::DuplicateName(name) => {
                write!(f, "An endpoint named '{name}' is already registered")
            }
            RegistrationError::RouteConflict { method, path } => {
                write!(f, "Route {method} {path} is already taken")
            }
            RegistrationError::InvalidPath(path) => {
                write!(f, "Invalid endpoint path '{path}': paths must start with '/'")
            }
        }
    }
}

impl std::error::Error for RegistrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistrationError::Compile(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CompileError> for RegistrationError {
    fn from(err: CompileError) -> Self {
        RegistrationError::Compile(err)
    }
}
