#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use serde::{Deserialize, Serialize};
use tapi::{Api, ApiMethod, Callable, HandlerCatalog, Record};

pub const SAMPLE_MODULE: &str = "tests.cli.files.sample";

pub fn execute_addition(x: i64, y: i64) -> i64 {
    x + y
}

pub fn execute_subtraction(x: i64, y: i64) -> i64 {
    x - y
}

pub fn execute_divide(x: i64, y: i64) -> anyhow::Result<f64> {
    anyhow::ensure!(y != 0, "division by zero");
    Ok(x as f64 / y as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub mod geo {
    use serde::{Deserialize, Serialize};
    use tapi::Record;

    /// Shares its name with [`super::Point`] on purpose.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
    pub struct Point {
        pub lat: f64,
    }
}

pub fn combine(a: Point, b: geo::Point) -> f64 {
    a.x + a.y + b.lat
}

pub fn midpoint(a: Point, b: Point) -> Point {
    Point {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}

pub fn add() -> Callable {
    Callable::new("execute_addition", &["x", "y"], execute_addition)
}

pub fn subtract() -> Callable {
    Callable::new("execute_subtraction", &["x", "y"], execute_subtraction)
}

pub fn divide() -> Callable {
    Callable::new("execute_divide", &["x", "y"], execute_divide)
}

pub fn catalog() -> HandlerCatalog {
    HandlerCatalog::new()
        .with_function(SAMPLE_MODULE, add())
        .with_function(SAMPLE_MODULE, subtract())
        .with_function(SAMPLE_MODULE, divide())
        .with_value(SAMPLE_MODULE, "NOT_A_FUNCTION", serde_json::json!("constant"))
}

/// `add` on GET and POST, `subtract` on GET, `divide` on POST.
pub fn arithmetic_api() -> Api {
    let mut api = Api::with_info("arithmetic", "1.0.0");
    api.add_endpoint("add", "/add", &add(), ApiMethod::Post).unwrap();
    api.add_endpoint("add_get", "/add", &add(), ApiMethod::Get).unwrap();
    api.add_endpoint("subtract", "/subtract", &subtract(), ApiMethod::Get)
        .unwrap();
    api.add_endpoint("divide", "/divide", &divide(), ApiMethod::Post)
        .unwrap();
    api
}

pub fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub mod test_server {
    use std::sync::Once;

    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }
}
