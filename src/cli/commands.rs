use crate::api::Api;
use crate::config::load_api_config;
use crate::resolver::HandlerCatalog;
use crate::runtime_config::RuntimeConfig;
use crate::server::{serve, ServerHandle};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Command-line interface for tapi
///
/// Builds an API from a YAML config whose handlers are looked up in the
/// binary's [`HandlerCatalog`].
#[derive(Parser)]
#[command(name = "tapi")]
#[command(about = "Serve typed Rust functions as a JSON API", long_about = None, version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Load the config, register every endpoint and serve it over HTTP
    Run {
        /// Path to the API config (YAML, or JSON by extension)
        #[arg(short, long, env = "TAPI_CONFIG")]
        config: PathBuf,

        /// Interface to bind
        #[arg(long, env = "TAPI_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind
        #[arg(short, long, env = "TAPI_PORT", default_value_t = 8000)]
        port: u16,
    },
    /// Load and compile every endpoint without serving
    Check {
        /// Path to the API config (YAML, or JSON by extension)
        #[arg(short, long, env = "TAPI_CONFIG")]
        config: PathBuf,

        /// Print the OpenAPI document instead of the route table
        #[arg(long, default_value_t = false)]
        openapi: bool,
    },
}

/// Parse the process arguments and execute the command.
///
/// # Errors
///
/// See [`execute`].
pub fn run_cli(catalog: &HandlerCatalog) -> Result<()> {
    let cli = Cli::parse();
    execute(&cli, catalog)
}

/// Execute a parsed command against `catalog`.
///
/// # Errors
///
/// Returns an error if:
/// - The config cannot be read or is invalid
/// - A handler reference does not resolve or cannot become an endpoint
/// - The server cannot bind its address
pub fn execute(cli: &Cli, catalog: &HandlerCatalog) -> Result<()> {
    match &cli.command {
        Commands::Run { config, host, port } => {
            let api = build(config, catalog)?;
            let runtime_config = RuntimeConfig::from_env();
            runtime_config.apply_to_may();
            let runtime = runtime_config
                .build_tokio_runtime()
                .context("Failed to start the tokio runtime")?;
            let handle = serve(Arc::new(api), runtime.handle().clone(), (host.as_str(), *port))
                .with_context(|| format!("Failed to bind {host}:{port}"))?;
            wait_for_shutdown(handle)?;
            runtime.shutdown_timeout(Duration::from_secs(5));
            Ok(())
        }
        Commands::Check { config, openapi } => {
            let api = build(config, catalog)?;
            if *openapi {
                println!("{}", serde_json::to_string_pretty(&api.openapi())?);
            } else {
                print!("{}", render_routes(&api));
            }
            Ok(())
        }
    }
}

fn build(config: &Path, catalog: &HandlerCatalog) -> Result<Api> {
    let config = load_api_config(config)?;
    config.build_api(catalog)
}

/// One line per route: `METHOD path -> name (function)`.
pub fn render_routes(api: &Api) -> String {
    api.endpoints()
        .map(|e| {
            format!(
                "{:<6} {} -> {} ({})\n",
                e.method().as_str(),
                e.path(),
                e.name(),
                e.handler().callable().name()
            )
        })
        .collect()
}

#[cfg(unix)]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("Failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "Shutdown signal received");
    }
    handle.stop();
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("Server stopped unexpectedly: {e:?}"))
}
