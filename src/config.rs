//! # Config Module
//!
//! Declarative API configuration.
//!
//! ```yaml
//! title: arithmetic
//! endpoints:
//!   - name: add
//!     path: /add
//!     handler: tapi.examples.arithmetic.execute_addition
//!     method: GET
//!   - name: subtract
//!     path: /subtract
//!     handler: tapi.examples.arithmetic.execute_subtraction
//! ```
//!
//! `method` defaults to `POST`. Unknown keys are rejected. Files ending in
//! `.json` are read as JSON, anything else as YAML.

use crate::api::{Api, ApiMethod};
use crate::resolver::HandlerCatalog;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::info;

/// One endpoint declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    pub name: String,
    pub path: String,
    /// Dotted reference resolved through a [`HandlerCatalog`]
    pub handler: String,
    #[serde(default)]
    pub method: ApiMethod,
}

/// The whole API, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub endpoints: Vec<EndpointConfig>,
}

/// A configuration file that cannot be used.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Malformed document or a declaration that breaks a rule
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "cannot read config '{path}': {source}"),
            ConfigError::Invalid(reason) => write!(f, "invalid API config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl ApiConfig {
    /// Parse and check a YAML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for malformed YAML, unknown keys, or a
    /// declaration that fails [`check`](Self::check).
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ApiConfig =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Parse and check a JSON document.
    ///
    /// # Errors
    ///
    /// See [`from_yaml_str`](Self::from_yaml_str).
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: ApiConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Rules serde cannot express: non-empty unique names, non-empty
    /// handlers, and paths that start with `/`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending endpoint.
    pub fn check(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            if endpoint.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("endpoints[{index}]: name is empty")));
            }
            if endpoint.handler.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "endpoint '{}': handler is empty",
                    endpoint.name
                )));
            }
            if !endpoint.path.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "endpoint '{}': path '{}' must start with '/'",
                    endpoint.name, endpoint.path
                )));
            }
            if !names.insert(endpoint.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "endpoint '{}' is declared more than once",
                    endpoint.name
                )));
            }
        }
        Ok(())
    }

    /// Resolve every handler and register it, in declaration order.
    ///
    /// # Errors
    ///
    /// The first resolution or registration failure, with the endpoint name
    /// as context.
    pub fn build_api(&self, catalog: &HandlerCatalog) -> anyhow::Result<Api> {
        let mut api = Api::with_info(
            self.title.as_deref().unwrap_or("tapi"),
            self.version
                .as_deref()
                .unwrap_or(env!("CARGO_PKG_VERSION")),
        );
        for endpoint in &self.endpoints {
            let callable = catalog
                .get_endpoint_handler(&endpoint.handler)
                .with_context(|| format!("endpoint '{}'", endpoint.name))?;
            api.add_endpoint(&endpoint.name, &endpoint.path, &callable, endpoint.method)
                .with_context(|| format!("endpoint '{}'", endpoint.name))?;
        }
        info!(endpoints = api.len(), title = %api.title(), "API built from config");
        Ok(api)
    }
}

/// Read and check an API config file.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read, otherwise see
/// [`ApiConfig::from_yaml_str`].
pub fn load_api_config(path: impl AsRef<Path>) -> Result<ApiConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = if path.extension().is_some_and(|ext| ext == "json") {
        ApiConfig::from_json_str(&content)?
    } else {
        ApiConfig::from_yaml_str(&content)?
    };
    info!(path = %path.display(), endpoints = config.endpoints.len(), "API config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_method_defaults_to_post() {
        let config = ApiConfig::from_yaml_str(
            "endpoints:\n  - name: add\n    path: /add\n    handler: m.execute_addition\n",
        )
        .unwrap();
        assert_eq!(config.endpoints[0].method, ApiMethod::Post);
        assert_eq!(config.title, None);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = ApiConfig::from_yaml_str(
            "endpoints:\n  - name: add\n    path: /add\n    handler: m.f\n    verb: GET\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_semantic_checks() {
        let cases = [
            "endpoints:\n  - name: ''\n    path: /add\n    handler: m.f\n",
            "endpoints:\n  - name: add\n    path: add\n    handler: m.f\n",
            "endpoints:\n  - name: add\n    path: /a\n    handler: m.f\n  - name: add\n    path: /b\n    handler: m.f\n",
            "endpoints:\n  - name: add\n    path: /a\n    handler: ' '\n",
        ];
        for case in cases {
            assert!(
                matches!(ApiConfig::from_yaml_str(case), Err(ConfigError::Invalid(_))),
                "{case}"
            );
        }
    }

    #[test]
    fn test_json_config() {
        let config = ApiConfig::from_json_str(
            r#"{"endpoints": [{"name": "add", "path": "/add", "handler": "m.f", "method": "GET"}]}"#,
        )
        .unwrap();
        assert_eq!(config.endpoints[0].method, ApiMethod::Get);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_api_config("/definitely/not/here.yml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
