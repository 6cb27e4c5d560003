//! # API Module
//!
//! The endpoint registry and the one place where request outcomes become
//! HTTP responses.
//!
//! ## Overview
//!
//! An [`Api`] owns every [`EndpointDescriptor`]. Endpoints are added at
//! startup with [`Api::add_endpoint`]; registration errors are programmer
//! errors and stop startup. Requests go through [`Api::handle`], which
//! always answers with a well-formed body:
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | success | 200 | `{"result": ..., "http_code": 200}` |
//! | `GET /health_check` | 200 | `{"message": "Service is running", ...}` |
//! | unknown path | 404 | `{"message": "Not Found", ...}` |
//! | wrong method | 405 | `{"message": "Method Not Allowed", ...}` |
//! | bad input | 422 | `{"message": "<what was wrong>", ...}` |
//! | function error or panic | 500 | `{"message": "Internal server error", ...}` |
//!
//! ## Example
//!
//! ```rust,ignore
//! use tapi::{Api, ApiMethod, ApiRequest, Callable};
//!
//! fn execute_addition(x: i64, y: i64) -> i64 {
//!     x + y
//! }
//!
//! let mut api = Api::new();
//! api.add_endpoint("add", "/add", &Callable::new("execute_addition", &["x", "y"], execute_addition), ApiMethod::Get)?;
//! let response = api.handle(ApiRequest::get("/add?x=5&y=10")).await;
//! assert_eq!(response.status, 200);
//! ```

mod envelope;
mod openapi;
mod registry;
mod request;

pub use envelope::{
    ApiResponse, ResponseBody, ResponseEnvelope, HEALTH_MESSAGE, INTERNAL_ERROR_MESSAGE,
    METHOD_NOT_ALLOWED_MESSAGE, NOT_FOUND_MESSAGE,
};
pub use openapi::{component_key, openapi_document};
pub use registry::{Api, EndpointDescriptor, HEALTH_CHECK_PATH, OPENAPI_PATH};
pub use request::{parse_query_pairs, split_target, ApiMethod, ApiRequest, QueryPairs};
