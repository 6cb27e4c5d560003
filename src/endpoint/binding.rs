//! Request binding: turn an [`ApiRequest`] into the argument object of an
//! input model.

use crate::api::{ApiMethod, ApiRequest};
use crate::schema::{GeneratedSchema, ValidationError};
use crate::types::TypeDescriptor;
use serde_json::{Map, Value};
use tracing::debug;

/// Where an endpoint reads its arguments from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Every parameter comes from the query string; the body is ignored
    Query,
    /// Every parameter comes from a single JSON object body
    Body,
}

impl From<ApiMethod> for Binding {
    fn from(method: ApiMethod) -> Self {
        match method {
            ApiMethod::Get => Binding::Query,
            ApiMethod::Post => Binding::Body,
        }
    }
}

impl Binding {
    /// Collect the raw argument object for `model` from `request`.
    ///
    /// The object is not validated here.
    ///
    /// # Errors
    ///
    /// Body binding fails when the body is missing, is not JSON, or is not
    /// a JSON object.
    pub fn extract(
        &self,
        request: &ApiRequest,
        model: &GeneratedSchema,
    ) -> Result<Map<String, Value>, ValidationError> {
        match self {
            Binding::Query => Ok(bind_query(request, model)),
            Binding::Body => bind_body(request, model),
        }
    }
}

fn input_error(model: &GeneratedSchema, reason: impl Into<String>) -> ValidationError {
    ValidationError {
        schema: model.name().to_string(),
        status: crate::schema::UNPROCESSABLE_ENTITY,
        errors: vec![reason.into()],
    }
}

/// One entry per model field that appears in the query string. Extra keys
/// are ignored and missing ones are left for validation to report.
pub fn bind_query(request: &ApiRequest, model: &GeneratedSchema) -> Map<String, Value> {
    let mut arguments = Map::new();
    for field in model.fields() {
        let values: Vec<&str> = request.query_values(&field.name).collect();
        if values.is_empty() {
            continue;
        }
        arguments.insert(field.name.clone(), coerce_query_values(&field.ty, &values));
    }
    debug!(
        model = %model.name(),
        bound = arguments.len(),
        query_pairs = request.query.len(),
        "Query parameters bound"
    );
    arguments
}

/// Coerce the raw query values of one parameter by its declared type.
///
/// Values that do not parse are passed on as strings so that validation
/// reports them against the declared type.
pub fn coerce_query_values(ty: &TypeDescriptor, values: &[&str]) -> Value {
    match ty {
        TypeDescriptor::Sequence(element) | TypeDescriptor::Set(element) => {
            if let [single] = values {
                if single.trim_start().starts_with('[') {
                    if let Ok(parsed @ Value::Array(_)) = serde_json::from_str(single) {
                        return parsed;
                    }
                }
            }
            Value::Array(values.iter().map(|v| coerce_scalar(element, v)).collect())
        }
        _ => {
            let last = values.last().copied().unwrap_or_default();
            coerce_scalar(ty, last)
        }
    }
}

fn coerce_scalar(ty: &TypeDescriptor, raw: &str) -> Value {
    let fallback = || Value::String(raw.to_string());
    match ty {
        TypeDescriptor::Integer => raw
            .parse::<i64>()
            .map(Value::from)
            .or_else(|_| raw.parse::<u64>().map(Value::from))
            .unwrap_or_else(|_| fallback()),
        TypeDescriptor::Float => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(fallback),
        TypeDescriptor::Boolean => parse_bool(raw).map(Value::Bool).unwrap_or_else(fallback),
        TypeDescriptor::Optional(inner) => {
            if raw.is_empty() || raw == "null" {
                Value::Null
            } else {
                coerce_scalar(inner, raw)
            }
        }
        TypeDescriptor::Mapping(..)
        | TypeDescriptor::Record(_)
        | TypeDescriptor::Sequence(_)
        | TypeDescriptor::Set(_)
        | TypeDescriptor::Tuple(_) => serde_json::from_str(raw).unwrap_or_else(|_| fallback()),
        TypeDescriptor::Any => serde_json::from_str(raw).unwrap_or_else(|_| fallback()),
        TypeDescriptor::String | TypeDescriptor::Unit => fallback(),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// The request body as a JSON object.
///
/// A model without fields accepts a missing or blank body as `{}`.
///
/// # Errors
///
/// Missing body, malformed JSON, or a JSON value that is not an object.
pub fn bind_body(
    request: &ApiRequest,
    model: &GeneratedSchema,
) -> Result<Map<String, Value>, ValidationError> {
    let raw = request.body.as_deref().map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        if model.fields().is_empty() {
            return Ok(Map::new());
        }
        return Err(input_error(model, "request body is missing"));
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => {
            debug!(model = %model.name(), body_fields = map.len(), "JSON body bound");
            Ok(map)
        }
        Ok(_) => Err(input_error(model, "request body must be a JSON object")),
        Err(err) => Err(input_error(model, format!("request body is not valid JSON: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_scalars() {
        assert_eq!(coerce_query_values(&TypeDescriptor::Integer, &["5"]), json!(5));
        assert_eq!(coerce_query_values(&TypeDescriptor::Float, &["2.5"]), json!(2.5));
        assert_eq!(coerce_query_values(&TypeDescriptor::Boolean, &["on"]), json!(true));
        assert_eq!(coerce_query_values(&TypeDescriptor::Boolean, &["No"]), json!(false));
        assert_eq!(coerce_query_values(&TypeDescriptor::String, &["5"]), json!("5"));
    }

    #[test]
    fn test_unparseable_values_stay_strings() {
        assert_eq!(coerce_query_values(&TypeDescriptor::Integer, &["five"]), json!("five"));
        assert_eq!(coerce_query_values(&TypeDescriptor::Float, &["nan"]), json!("nan"));
        assert_eq!(coerce_query_values(&TypeDescriptor::Boolean, &["maybe"]), json!("maybe"));
    }

    #[test]
    fn test_repeated_keys_bind_sequences() {
        let ty = TypeDescriptor::sequence(TypeDescriptor::Integer);
        assert_eq!(coerce_query_values(&ty, &["1", "2", "3"]), json!([1, 2, 3]));
        assert_eq!(coerce_query_values(&ty, &["[4, 5]"]), json!([4, 5]));
        assert_eq!(coerce_query_values(&ty, &["7"]), json!([7]));
    }

    #[test]
    fn test_json_text_binds_mappings() {
        let ty = TypeDescriptor::mapping(TypeDescriptor::String, TypeDescriptor::Float);
        assert_eq!(coerce_query_values(&ty, &[r#"{"a": 1.5}"#]), json!({"a": 1.5}));
        assert_eq!(coerce_query_values(&ty, &["oops"]), json!("oops"));
    }

    #[test]
    fn test_last_scalar_wins() {
        assert_eq!(coerce_query_values(&TypeDescriptor::Integer, &["1", "2"]), json!(2));
    }

    #[test]
    fn test_binding_from_method() {
        assert_eq!(Binding::from(ApiMethod::Get), Binding::Query);
        assert_eq!(Binding::from(ApiMethod::Post), Binding::Body);
    }
}
