//! # Runtime Configuration Module
//!
//! Environment-driven settings for the two runtimes a served API uses: the
//! `may` coroutine runtime behind the HTTP server, and the tokio runtime
//! that drives endpoint futures.
//!
//! ## Environment Variables
//!
//! ### `TAPI_STACK_SIZE`
//!
//! Stack size of each connection coroutine. Accepts decimal (`32768`) or
//! hexadecimal (`0x8000`). Default: `0x8000` (32 KB).
//!
//! ### `TAPI_WORKER_THREADS`
//!
//! Number of tokio worker threads. Default: the available parallelism.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tapi::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! config.apply_to_may();
//! let runtime = config.build_tokio_runtime()?;
//! ```

use std::env;

const DEFAULT_STACK_SIZE: usize = 0x8000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
    /// tokio worker threads used to run endpoint functions
    pub worker_threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            worker_threads: default_worker_threads(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let stack_size = env::var("TAPI_STACK_SIZE")
            .ok()
            .and_then(|val| parse_size(&val))
            .unwrap_or(DEFAULT_STACK_SIZE);
        let worker_threads = env::var("TAPI_WORKER_THREADS")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or_else(default_worker_threads);
        RuntimeConfig {
            stack_size,
            worker_threads,
        }
    }

    /// Set the `may` coroutine stack size. Call before the server starts.
    pub fn apply_to_may(&self) {
        may::config().set_stack_size(self.stack_size);
    }

    /// Multi-threaded tokio runtime with the configured worker count.
    ///
    /// # Errors
    ///
    /// Propagates the runtime builder's I/O error.
    pub fn build_tokio_runtime(&self) -> std::io::Result<tokio::runtime::Runtime> {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.worker_threads)
            .thread_name("tapi-worker")
            .enable_all()
            .build()
    }
}

fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Decimal or `0x`-prefixed hexadecimal size.
fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("0x4000"), Some(0x4000));
        assert_eq!(parse_size("32768"), Some(32768));
        assert_eq!(parse_size(" 0X10 "), Some(16));
        assert_eq!(parse_size("lots"), None);
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.stack_size, DEFAULT_STACK_SIZE);
        assert!(config.worker_threads > 0);
    }

    #[test]
    fn test_build_tokio_runtime() {
        let config = RuntimeConfig {
            stack_size: DEFAULT_STACK_SIZE,
            worker_threads: 1,
        };
        let runtime = config.build_tokio_runtime();
        assert!(runtime.is_ok());
    }
}
