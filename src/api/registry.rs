use super::envelope::{
    ApiResponse, ResponseEnvelope, HEALTH_MESSAGE, INTERNAL_ERROR_MESSAGE,
    METHOD_NOT_ALLOWED_MESSAGE, NOT_FOUND_MESSAGE,
};
use super::openapi::openapi_document;
use super::request::{ApiMethod, ApiRequest};
use crate::callable::{Callable, InvocationError};
use crate::endpoint::{generate_endpoint, EndpointHandler, HandlerError};
use crate::error::RegistrationError;
use crate::schema::{GeneratedSchema, UNPROCESSABLE_ENTITY};
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Built-in liveness route.
pub const HEALTH_CHECK_PATH: &str = "/health_check";
/// Built-in route serving the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/openapi.json";

/// A registered route. Immutable once created.
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    name: String,
    path: String,
    method: ApiMethod,
    handler: EndpointHandler,
    input_schema: GeneratedSchema,
    output_schema: GeneratedSchema,
}

impl EndpointDescriptor {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn method(&self) -> ApiMethod {
        self.method
    }

    #[must_use]
    pub fn handler(&self) -> &EndpointHandler {
        &self.handler
    }

    #[must_use]
    pub fn input_schema(&self) -> &GeneratedSchema {
        &self.input_schema
    }

    #[must_use]
    pub fn output_schema(&self) -> &GeneratedSchema {
        &self.output_schema
    }
}

/// The API registry: every endpoint, indexed by name and by route.
///
/// Registration takes `&mut self` and happens before serving; request
/// handling only reads, so a built `Api` can be shared behind an `Arc`.
#[derive(Debug)]
pub struct Api {
    title: String,
    version: String,
    endpoints: Vec<EndpointDescriptor>,
    by_name: HashMap<String, usize>,
    routes: HashMap<String, HashMap<ApiMethod, usize>>,
}

impl Default for Api {
    fn default() -> Self {
        Self::new()
    }
}

impl Api {
    pub fn new() -> Self {
        Self::with_info("tapi", env!("CARGO_PKG_VERSION"))
    }

    /// Registry whose OpenAPI document carries the given title and version.
    pub fn with_info(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            endpoints: Vec::new(),
            by_name: HashMap::new(),
            routes: HashMap::new(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Compile `callable` and expose it at `method path`.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::DuplicateName`] if `name` is taken
    /// - [`RegistrationError::InvalidPath`] if `path` does not start with `/`
    /// - [`RegistrationError::RouteConflict`] if the route is taken or reserved
    /// - [`RegistrationError::Compile`] if the callable cannot become an endpoint
    pub fn add_endpoint(
        &mut self,
        name: &str,
        path: &str,
        callable: &Callable,
        method: ApiMethod,
    ) -> Result<&EndpointDescriptor, RegistrationError> {
        if self.by_name.contains_key(name) {
            return Err(RegistrationError::DuplicateName(name.to_string()));
        }
        if !path.starts_with('/') {
            return Err(RegistrationError::InvalidPath(path.to_string()));
        }
        let reserved = path == HEALTH_CHECK_PATH || path == OPENAPI_PATH;
        let taken = self
            .routes
            .get(path)
            .is_some_and(|methods| methods.contains_key(&method));
        if reserved || taken {
            return Err(RegistrationError::RouteConflict {
                method,
                path: path.to_string(),
            });
        }

        let (handler, output_schema) = generate_endpoint(callable, name, method)?;
        let descriptor = EndpointDescriptor {
            name: name.to_string(),
            path: path.to_string(),
            method,
            input_schema: handler.input_model().clone(),
            output_schema,
            handler,
        };

        let index = self.endpoints.len();
        self.endpoints.push(descriptor);
        self.by_name.insert(name.to_string(), index);
        self.routes
            .entry(path.to_string())
            .or_default()
            .insert(method, index);
        info!(endpoint = %name, %method, path = %path, "Endpoint registered");
        Ok(&self.endpoints[index])
    }

    /// Registered endpoints in registration order.
    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.endpoints.iter()
    }

    #[must_use]
    pub fn endpoint(&self, name: &str) -> Option<&EndpointDescriptor> {
        self.by_name.get(name).and_then(|i| self.endpoints.get(*i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// The OpenAPI 3.1 description of every registered route.
    #[must_use]
    pub fn openapi(&self) -> Value {
        openapi_document(self)
    }

    /// Answer one request. Never fails: every outcome, including a
    /// panicking function, becomes an envelope.
    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        let started = Instant::now();
        let response = self.dispatch(&request).await;
        info!(
            method = %request.method,
            path = %request.path,
            status = response.status,
            latency_ms = started.elapsed().as_millis() as u64,
            "Request handled"
        );
        response
    }

    async fn dispatch(&self, request: &ApiRequest) -> ApiResponse {
        match request.path.as_str() {
            HEALTH_CHECK_PATH => {
                return if request.method == http::Method::GET {
                    ApiResponse::envelope(ResponseEnvelope::with_message(200, HEALTH_MESSAGE))
                } else {
                    ApiResponse::failure(405, METHOD_NOT_ALLOWED_MESSAGE)
                };
            }
            OPENAPI_PATH => {
                return if request.method == http::Method::GET {
                    ApiResponse::document(self.openapi())
                } else {
                    ApiResponse::failure(405, METHOD_NOT_ALLOWED_MESSAGE)
                };
            }
            _ => {}
        }

        let Some(methods) = self.routes.get(&request.path) else {
            debug!(path = %request.path, "No route");
            return ApiResponse::failure(404, NOT_FOUND_MESSAGE);
        };
        let endpoint = ApiMethod::from_http(&request.method)
            .and_then(|method| methods.get(&method))
            .and_then(|index| self.endpoints.get(*index));
        let Some(endpoint) = endpoint else {
            debug!(method = %request.method, path = %request.path, "Method not allowed");
            return ApiResponse::failure(405, METHOD_NOT_ALLOWED_MESSAGE);
        };

        match AssertUnwindSafe(endpoint.handler.call(request))
            .catch_unwind()
            .await
        {
            Ok(Ok(envelope)) => ApiResponse::envelope(envelope),
            Ok(Err(err)) => translate(endpoint, err),
            Err(panic) => {
                error!(
                    endpoint = %endpoint.name,
                    panic = %panic_message(panic.as_ref()),
                    "Endpoint function panicked"
                );
                ApiResponse::failure(500, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

/// The single place where handler failures become HTTP shapes.
fn translate(endpoint: &EndpointDescriptor, err: HandlerError) -> ApiResponse {
    match err {
        HandlerError::Input(err) => {
            warn!(endpoint = %endpoint.name, errors = ?err.errors, "Input rejected");
            ApiResponse::failure(err.status, err.to_string())
        }
        HandlerError::Invocation(err @ InvocationError::BadArgument { .. }) => {
            warn!(endpoint = %endpoint.name, error = %err, "Argument rejected");
            ApiResponse::failure(UNPROCESSABLE_ENTITY, err.to_string())
        }
        HandlerError::Invocation(err) => {
            error!(endpoint = %endpoint.name, error = %err, "Endpoint function failed");
            ApiResponse::failure(500, INTERNAL_ERROR_MESSAGE)
        }
        HandlerError::Output(err) => {
            error!(
                endpoint = %endpoint.name,
                errors = ?err.errors,
                "Endpoint returned a value that does not match its output model"
            );
            ApiResponse::failure(500, INTERNAL_ERROR_MESSAGE)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
