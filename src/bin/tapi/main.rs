use tapi::logging::{init_logging, LogConfig};
use tapi::{callable, HandlerCatalog};

mod arithmetic;

const ARITHMETIC_MODULE: &str = "tapi.examples.arithmetic";

fn catalog() -> HandlerCatalog {
    HandlerCatalog::new()
        .with_function(ARITHMETIC_MODULE, callable!(arithmetic::execute_addition, x, y))
        .with_function(ARITHMETIC_MODULE, callable!(arithmetic::execute_subtraction, x, y))
        .with_function(ARITHMETIC_MODULE, callable!(arithmetic::execute_divide, x, y))
}

fn main() -> anyhow::Result<()> {
    init_logging(&LogConfig::from_env())?;
    tapi::cli::run_cli(&catalog())
}
