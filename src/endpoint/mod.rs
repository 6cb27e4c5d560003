//! # Endpoint Module
//!
//! Compiles a [`Callable`](crate::Callable) into an [`EndpointHandler`].
//!
//! A GET endpoint binds every parameter from the query string, coercing the
//! raw text by the parameter's declared type. A POST endpoint binds every
//! parameter from one JSON object body. Either way the bound object is
//! validated against the input model before the function runs, and the
//! function's return value is validated against the output model before it
//! is wrapped as `{"result": ..., "http_code": 200}`.
//!
//! Handlers return [`HandlerError`] on failure and never catch panics; the
//! [`Api`](crate::Api) registry owns the translation into error envelopes.

mod binding;
mod handler;

pub use binding::{bind_body, bind_query, coerce_query_values, Binding};
pub use handler::{
    generate_endpoint, generate_get_endpoint, generate_post_endpoint, EndpointHandler,
    HandlerError,
};
