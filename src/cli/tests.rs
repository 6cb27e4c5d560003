//! Unit tests for CLI commands

#![allow(clippy::unwrap_used, clippy::panic)]

use crate::cli::{execute, render_routes, Cli, Commands};
use crate::{Api, ApiMethod, Callable, HandlerCatalog};
use clap::Parser;
use std::io::Write;

fn execute_addition(x: i64, y: i64) -> i64 {
    x + y
}

#[test]
fn test_run_command_defaults() {
    let cli = Cli::try_parse_from(["tapi", "run", "--config", "api.yml"]).unwrap();
    match cli.command {
        Commands::Run { config, host, port } => {
            assert_eq!(config.to_string_lossy(), "api.yml");
            assert_eq!(host, "127.0.0.1");
            assert_eq!(port, 8000);
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn test_run_command_with_flags() {
    let cli = Cli::try_parse_from([
        "tapi", "run", "-c", "api.yml", "--host", "0.0.0.0", "-p", "9090",
    ])
    .unwrap();
    match cli.command {
        Commands::Run { host, port, .. } => {
            assert_eq!(host, "0.0.0.0");
            assert_eq!(port, 9090);
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn test_check_command() {
    let cli = Cli::try_parse_from(["tapi", "check", "--config", "api.yml", "--openapi"]).unwrap();
    match cli.command {
        Commands::Check { openapi, .. } => assert!(openapi),
        _ => panic!("Expected Check command"),
    }
}

#[test]
fn test_invalid_port_rejected() {
    assert!(Cli::try_parse_from(["tapi", "run", "--config", "a.yml", "--port", "http"]).is_err());
}

#[test]
fn test_render_routes() {
    let mut api = Api::new();
    let add = Callable::new("execute_addition", &["x", "y"], execute_addition);
    api.add_endpoint("add", "/add", &add, ApiMethod::Get).unwrap();
    assert_eq!(render_routes(&api), "GET    /add -> add (execute_addition)\n");
}

#[test]
fn test_check_executes_against_catalog() {
    let catalog = HandlerCatalog::new().with_function(
        "sample",
        Callable::new("execute_addition", &["x", "y"], execute_addition),
    );
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    writeln!(
        file,
        "endpoints:\n  - name: add\n    path: /add\n    handler: sample.execute_addition\n    method: GET"
    )
    .unwrap();

    let cli = Cli::try_parse_from(["tapi", "check", "--config", file.path().to_str().unwrap()]).unwrap();
    assert!(execute(&cli, &catalog).is_ok());

    let empty = HandlerCatalog::new();
    assert!(execute(&cli, &empty).is_err());
}
