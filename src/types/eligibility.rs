use super::{FunctionSignature, TypeDescriptor};
use crate::callable::Callable;
use crate::error::CompileError;
use std::collections::HashSet;
use tracing::debug;

/// Whether `ty` may appear as a parameter or return type of an endpoint.
///
/// Scalars, sequences and string- or integer-keyed mappings of allowed
/// types, and any record. A bare container (element `Any`) is allowed; a
/// bare `Any` on its own is not, and neither are tuples, sets or optionals.
#[must_use]
pub fn is_allowed_type(ty: &TypeDescriptor) -> bool {
    match ty {
        TypeDescriptor::Integer
        | TypeDescriptor::Float
        | TypeDescriptor::String
        | TypeDescriptor::Boolean
        | TypeDescriptor::Record(_) => true,
        TypeDescriptor::Sequence(element) => is_allowed_element(element),
        TypeDescriptor::Mapping(key, value) => {
            matches!(
                **key,
                TypeDescriptor::String | TypeDescriptor::Integer | TypeDescriptor::Any
            ) && is_allowed_element(value)
        }
        TypeDescriptor::Tuple(_)
        | TypeDescriptor::Set(_)
        | TypeDescriptor::Optional(_)
        | TypeDescriptor::Any
        | TypeDescriptor::Unit => false,
    }
}

fn is_allowed_element(ty: &TypeDescriptor) -> bool {
    matches!(ty, TypeDescriptor::Any) || is_allowed_type(ty)
}

/// Check that a signature can be compiled into an endpoint.
///
/// # Errors
///
/// In order of precedence: [`CompileError::ArityMismatch`],
/// [`CompileError::DuplicateParameter`], [`CompileError::MissingAnnotation`],
/// [`CompileError::InvalidType`], [`CompileError::InvalidReturnType`].
pub fn validate_signature(signature: &FunctionSignature) -> Result<(), CompileError> {
    if signature.arity != signature.parameters.len() {
        return Err(CompileError::ArityMismatch {
            expected: signature.arity,
            named: signature.parameters.len(),
        });
    }

    let mut seen = HashSet::new();
    for param in &signature.parameters {
        if !seen.insert(param.name.as_str()) {
            return Err(CompileError::DuplicateParameter(param.name.clone()));
        }
    }

    let missing: Vec<String> = signature
        .parameters
        .iter()
        .filter(|p| p.annotation.is_none())
        .map(|p| p.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(CompileError::MissingAnnotation(missing));
    }

    for param in &signature.parameters {
        if let Some(ty) = &param.annotation {
            if !is_allowed_type(ty) {
                return Err(CompileError::InvalidType {
                    parameter: param.name.clone(),
                    ty: ty.clone(),
                });
            }
        }
    }

    match &signature.returns {
        Some(ty) if is_allowed_type(ty) => Ok(()),
        other => Err(CompileError::InvalidReturnType(other.clone())),
    }
}

/// [`validate_signature`] for a callable, with a debug trace.
///
/// # Errors
///
/// See [`validate_signature`].
pub fn validate_callable(callable: &Callable) -> Result<(), CompileError> {
    let result = validate_signature(callable.signature());
    debug!(
        callable = %callable.name(),
        parameters = callable.signature().parameters.len(),
        valid = result.is_ok(),
        "Callable signature validated"
    );
    result
}
