//! # tapi
//!
//! **tapi** turns plain, typed Rust functions into JSON web API endpoints.
//!
//! ## Overview
//!
//! Give tapi a function and a name. It reflects the parameter and return
//! types into static descriptors, rejects signatures it cannot model,
//! synthesizes JSON-Schema backed input and output models, and compiles a
//! handler that binds arguments (query string for GET, JSON body for POST),
//! calls the function, and answers with a uniform envelope:
//!
//! ```json
//! {"result": 15, "http_code": 200}
//! {"message": "Not Found", "http_code": 404}
//! ```
//!
//! ## Architecture
//!
//! - **[`types`]** - Type descriptors, the [`Reflect`] and [`Record`] traits, eligibility rules
//! - **[`callable`]** - [`Callable`]: a function plus its static signature
//! - **[`schema`]** - Input/output model synthesis and validation
//! - **[`endpoint`]** - Compiles a callable into an [`EndpointHandler`](endpoint::EndpointHandler)
//! - **[`api`]** - The [`Api`] registry and the error-envelope boundary
//! - **[`resolver`]** - Dotted handler references against a [`HandlerCatalog`]
//! - **[`config`]** - YAML API declarations
//! - **[`server`]** - HTTP transport on `may_minihttp`
//! - **[`cli`]** - `tapi run` / `tapi check`
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as HttpServer<br/>(may_minihttp)
//!     participant Api as Api::handle<br/>(tokio)
//!     participant Handler as EndpointHandler
//!     participant Fn as Function
//!
//!     Client->>Server: GET /subtract?x=5&y=1
//!     Server->>Api: ApiRequest
//!     Api->>Handler: call(request)
//!     Handler->>Handler: bind + validate input model
//!     alt Input does not fit
//!         Handler-->>Api: HandlerError::Input
//!         Api-->>Client: 422 {"message": ...}
//!     end
//!     Handler->>Fn: invoke(arguments)
//!     alt Error or panic
//!         Api-->>Client: 500 {"message": "Internal server error"}
//!     end
//!     Fn-->>Handler: return value
//!     Handler->>Handler: validate output model
//!     Handler-->>Api: {"result": 4, "http_code": 200}
//!     Api-->>Client: 200
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tapi::{Api, ApiMethod, ApiRequest, Callable};
//!
//! fn execute_addition(x: i64, y: i64) -> i64 {
//!     x + y
//! }
//!
//! let add = Callable::new("execute_addition", &["x", "y"], execute_addition);
//! let mut api = Api::new();
//! api.add_endpoint("add", "/add", &add, ApiMethod::Post)?;
//!
//! let response = api.handle(ApiRequest::post("/add", r#"{"x": 5, "y": 10}"#)).await;
//! assert_eq!(response.status, 200);
//! ```
//!
//! ## Records
//!
//! Structs deriving [`Record`] (next to serde's derives) are accepted as
//! parameters and return values. A function that already returns a record
//! keeps the record's schema as its output model.
//!
//! ## Environment Variables
//!
//! - `TAPI_LOG_LEVEL`, `TAPI_LOG_FORMAT` - see [`logging`]
//! - `TAPI_STACK_SIZE`, `TAPI_WORKER_THREADS` - see [`runtime_config`]

extern crate self as tapi;

pub mod api;
pub mod callable;
pub mod cli;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod logging;
pub mod resolver;
pub mod runtime_config;
pub mod schema;
pub mod server;
pub mod types;

pub use api::{Api, ApiMethod, ApiRequest, ApiResponse, EndpointDescriptor, ResponseEnvelope};
pub use callable::{Callable, InvocationError, IntoCallable};
pub use config::{load_api_config, ApiConfig, ConfigError, EndpointConfig};
pub use endpoint::{generate_endpoint, generate_get_endpoint, generate_post_endpoint};
pub use error::{CompileError, RegistrationError};
pub use resolver::{get_endpoint_handler, Export, HandlerCatalog, InvalidHandlerFunction};
pub use schema::{generate_input_model, generate_output_model, GeneratedSchema, ValidationError};
pub use types::{
    is_allowed_type, validate_callable, FieldDescriptor, FunctionSignature, Record,
    RecordDescriptor, Reflect, TypeDescriptor,
};

/// `#[derive(Record)]`: field descriptors from a named struct, honoring
/// serde's `rename`, `skip` and `default` field attributes.
pub use tapi_macros::Record;
