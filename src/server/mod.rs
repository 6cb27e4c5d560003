//! # Server Module
//!
//! HTTP transport for an [`Api`](crate::Api), built on `may_minihttp`.
//!
//! Each connection is served by a `may` coroutine. The coroutine parses the
//! raw request into an [`ApiRequest`](crate::ApiRequest), hands it to a
//! tokio runtime where [`Api::handle`](crate::Api::handle) runs, parks until
//! the response comes back, and writes the envelope as JSON with the
//! envelope's status code.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tapi::server::serve;
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let handle = serve(Arc::new(api), runtime.handle().clone(), "127.0.0.1:8000")?;
//! handle.join().ok();
//! ```

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{serve, HttpServer, ServerHandle};
pub use request::parse_request;
pub use response::write_api_response;
pub use service::ApiService;
