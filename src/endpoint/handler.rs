use super::Binding;
use crate::api::{ApiMethod, ApiRequest, ResponseEnvelope};
use crate::callable::{Arguments, Callable, InvocationError};
use crate::error::CompileError;
use crate::schema::{
    generate_input_model, generate_output_model, GeneratedSchema, ModelOrigin, ValidationError,
};
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, info};

/// Why an endpoint call did not produce a success envelope.
///
/// Nothing here is translated into an HTTP shape; that happens once, in
/// [`Api::handle`](crate::Api::handle).
#[derive(Debug)]
pub enum HandlerError {
    /// The request did not fit the input model
    Input(ValidationError),
    /// The function could not be called or returned an error
    Invocation(InvocationError),
    /// The function's return value did not fit the output model
    Output(ValidationError),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Input(err) => write!(f, "{err}"),
            HandlerError::Invocation(err) => write!(f, "{err}"),
            HandlerError::Output(err) => write!(f, "output does not match model: {err}"),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandlerError::Input(err) | HandlerError::Output(err) => Some(err),
            HandlerError::Invocation(err) => Some(err),
        }
    }
}

/// A compiled endpoint: binding, validation and invocation of one function.
#[derive(Clone)]
pub struct EndpointHandler {
    name: String,
    callable: Callable,
    binding: Binding,
    input: GeneratedSchema,
    output: GeneratedSchema,
}

impl EndpointHandler {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn callable(&self) -> &Callable {
        &self.callable
    }

    #[must_use]
    pub fn binding(&self) -> Binding {
        self.binding
    }

    #[must_use]
    pub fn input_model(&self) -> &GeneratedSchema {
        &self.input
    }

    #[must_use]
    pub fn output_model(&self) -> &GeneratedSchema {
        &self.output
    }

    /// Extract and validate the arguments of `request`.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] when the request does not fit the input model.
    pub fn bind(&self, request: &ApiRequest) -> Result<Arguments, ValidationError> {
        let raw = self.binding.extract(request, &self.input)?;
        match self.input.instantiate(Value::Object(raw))? {
            Value::Object(arguments) => Ok(arguments),
            _ => Ok(Arguments::new()),
        }
    }

    /// Call the function with already validated arguments and wrap the
    /// result in a success envelope.
    ///
    /// # Errors
    ///
    /// [`HandlerError::Invocation`] or [`HandlerError::Output`].
    pub async fn invoke(&self, arguments: Arguments) -> Result<ResponseEnvelope, HandlerError> {
        let value = self
            .callable
            .invoke(arguments)
            .await
            .map_err(HandlerError::Invocation)?;
        let result = match self.output.origin() {
            ModelOrigin::Passthrough => self.output.instantiate(value),
            ModelOrigin::Synthesized => self
                .output
                .instantiate(json!({ "result": value }))
                .map(|mut instance| instance["result"].take()),
        }
        .map_err(HandlerError::Output)?;
        Ok(ResponseEnvelope::success(result))
    }

    /// Bind, invoke and wrap.
    ///
    /// # Errors
    ///
    /// See [`bind`](Self::bind) and [`invoke`](Self::invoke).
    pub async fn call(&self, request: &ApiRequest) -> Result<ResponseEnvelope, HandlerError> {
        let arguments = self.bind(request).map_err(HandlerError::Input)?;
        debug!(endpoint = %self.name, arguments = arguments.len(), "Arguments bound");
        self.invoke(arguments).await
    }
}

impl fmt::Debug for EndpointHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointHandler")
            .field("name", &self.name)
            .field("callable", &self.callable.name())
            .field("binding", &self.binding)
            .field("input", &self.input.name())
            .field("output", &self.output.name())
            .finish()
    }
}

fn generate(
    callable: &Callable,
    name: &str,
    binding: Binding,
) -> Result<(EndpointHandler, GeneratedSchema), CompileError> {
    let input = generate_input_model(callable, name)?;
    let output = generate_output_model(callable, name)?;
    info!(
        endpoint = %name,
        callable = %callable.name(),
        binding = ?binding,
        input_model = %input.name(),
        output_model = %output.name(),
        "Endpoint compiled"
    );
    let handler = EndpointHandler {
        name: name.to_string(),
        callable: callable.clone(),
        binding,
        input,
        output: output.clone(),
    };
    Ok((handler, output))
}

/// Compile `callable` into a handler that binds its arguments from the
/// query string.
///
/// # Errors
///
/// Any [`CompileError`] raised while synthesizing the models.
pub fn generate_get_endpoint(
    callable: &Callable,
    name: &str,
) -> Result<(EndpointHandler, GeneratedSchema), CompileError> {
    generate(callable, name, Binding::Query)
}

/// Compile `callable` into a handler that binds its arguments from a JSON
/// object body.
///
/// # Errors
///
/// Any [`CompileError`] raised while synthesizing the models.
pub fn generate_post_endpoint(
    callable: &Callable,
    name: &str,
) -> Result<(EndpointHandler, GeneratedSchema), CompileError> {
    generate(callable, name, Binding::Body)
}

/// [`generate_get_endpoint`] or [`generate_post_endpoint`] by method.
///
/// # Errors
///
/// Any [`CompileError`] raised while synthesizing the models.
pub fn generate_endpoint(
    callable: &Callable,
    name: &str,
    method: ApiMethod,
) -> Result<(EndpointHandler, GeneratedSchema), CompileError> {
    match Binding::from(method) {
        Binding::Query => generate_get_endpoint(callable, name),
        Binding::Body => generate_post_endpoint(callable, name),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashMap;

    fn execute_addition(x: i64, y: i64) -> i64 {
        x + y
    }

    fn totals(groups: HashMap<String, Vec<f64>>) -> HashMap<String, f64> {
        groups
            .into_iter()
            .map(|(k, v)| (k, v.iter().sum()))
            .collect()
    }

    fn lie(x: i64) -> Value {
        json!({ "x": x })
    }

    fn add() -> Callable {
        Callable::new("execute_addition", &["x", "y"], execute_addition)
    }

    #[tokio::test]
    async fn test_get_endpoint_binds_query() {
        let (handler, output) = generate_get_endpoint(&add(), "add").unwrap();
        assert_eq!(output.name(), "OutputModel - add");
        let envelope = handler.call(&ApiRequest::get("/add?x=5&y=10")).await.unwrap();
        assert_eq!(envelope, ResponseEnvelope::success(json!(15)));
    }

    #[tokio::test]
    async fn test_get_endpoint_ignores_body() {
        let (handler, _) = generate_get_endpoint(&add(), "add").unwrap();
        let req = ApiRequest::get("/add?x=1&y=2").with_body("not json");
        assert_eq!(handler.call(&req).await.unwrap().result(), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_post_endpoint_binds_body() {
        let (handler, _) = generate_post_endpoint(&add(), "add").unwrap();
        let envelope = handler
            .call(&ApiRequest::post("/add", r#"{"x": 5, "y": 10}"#))
            .await
            .unwrap();
        assert_eq!(envelope.result(), Some(&json!(15)));
    }

    #[tokio::test]
    async fn test_input_failures() {
        let (get, _) = generate_get_endpoint(&add(), "add").unwrap();
        let err = get.call(&ApiRequest::get("/add?x=five&y=1")).await.unwrap_err();
        assert!(matches!(err, HandlerError::Input(ref e) if e.status == 422));
        let err = get.call(&ApiRequest::get("/add?x=1")).await.unwrap_err();
        assert!(matches!(err, HandlerError::Input(_)));

        let (post, _) = generate_post_endpoint(&add(), "add").unwrap();
        for body in ["", "{not json", "[1, 2]"] {
            let err = post.call(&ApiRequest::post("/add", body)).await.unwrap_err();
            assert!(matches!(err, HandlerError::Input(_)), "body {body:?}");
        }
    }

    #[tokio::test]
    async fn test_nested_containers_round_trip() {
        let callable = Callable::new("totals", &["groups"], totals);
        let (handler, _) = generate_endpoint(&callable, "totals", ApiMethod::Post).unwrap();
        let envelope = handler
            .call(&ApiRequest::post("/totals", r#"{"groups": {"a": [1.0, 2.5]}}"#))
            .await
            .unwrap();
        assert_eq!(envelope.result(), Some(&json!({"a": 3.5})));
    }

    #[test]
    fn test_untyped_return_rejected() {
        let callable = Callable::new("lie", &["x"], lie);
        assert!(matches!(
            generate_post_endpoint(&callable, "lie"),
            Err(CompileError::InvalidReturnType(None))
        ));
    }
}
