//! # CLI Module
//!
//! `clap` front end for binaries that embed a [`HandlerCatalog`](crate::HandlerCatalog).
//!
//! ```bash
//! tapi run --config api.yml --host 0.0.0.0 --port 8000
//! tapi check --config api.yml --openapi
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, render_routes, run_cli, Cli, Commands};
