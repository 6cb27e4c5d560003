//! # Resolver Module
//!
//! Resolves dotted handler references such as
//! `"tapi.examples.arithmetic.execute_addition"` to a [`Callable`].
//!
//! Rust has no runtime import, so the set of importable functions is an
//! explicit [`HandlerCatalog`] assembled by the binary: module path ->
//! attribute name -> [`Export`]. Resolution returns the registered callable
//! itself (same identity, see [`Callable::ptr_eq`]) and performs no type
//! validation; that happens when the endpoint is registered.

use crate::callable::Callable;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Something a catalog module exposes.
#[derive(Debug, Clone)]
pub enum Export {
    Function(Callable),
    /// A non-callable attribute (a constant, a setting)
    Value(Value),
}

/// Why a reference could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveFailure {
    /// Not of the form `<module>.<attribute>`
    MalformedReference,
    UnknownModule,
    UnknownAttribute,
    /// The attribute exists but is not a function
    NotCallable,
}

impl fmt::Display for ResolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ResolveFailure::MalformedReference => "expected '<module>.<function>'",
            ResolveFailure::UnknownModule => "module not found",
            ResolveFailure::UnknownAttribute => "attribute not found",
            ResolveFailure::NotCallable => "attribute is not callable",
        };
        f.write_str(reason)
    }
}

/// A handler reference that does not name a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidHandlerFunction {
    pub reference: String,
    pub reason: ResolveFailure,
}

impl fmt::Display for InvalidHandlerFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid handler function '{}': {}",
            self.reference, self.reason
        )
    }
}

impl std::error::Error for InvalidHandlerFunction {}

/// Importable functions and values, keyed by module path.
#[derive(Debug, Clone, Default)]
pub struct HandlerCatalog {
    modules: BTreeMap<String, BTreeMap<String, Export>>,
}

impl HandlerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose `callable` as `<module>.<callable name>`.
    #[must_use]
    pub fn with_function(mut self, module: &str, callable: Callable) -> Self {
        let attribute = callable.name().to_string();
        self.insert(module, &attribute, Export::Function(callable));
        self
    }

    /// Expose a non-callable attribute.
    #[must_use]
    pub fn with_value(mut self, module: &str, attribute: &str, value: Value) -> Self {
        self.insert(module, attribute, Export::Value(value));
        self
    }

    /// Add or replace one export. Declares the module if needed.
    pub fn insert(&mut self, module: &str, attribute: &str, export: Export) {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(attribute.to_string(), export);
    }

    /// `<module>.<attribute>` for every exported function.
    pub fn function_references(&self) -> impl Iterator<Item = String> + '_ {
        self.modules.iter().flat_map(|(module, exports)| {
            exports.iter().filter_map(move |(attribute, export)| match export {
                Export::Function(_) => Some(format!("{module}.{attribute}")),
                Export::Value(_) => None,
            })
        })
    }

    /// Resolve `"<module>.<attribute>"`; the module part may itself contain
    /// dots.
    ///
    /// # Errors
    ///
    /// [`InvalidHandlerFunction`] when the reference is malformed, the
    /// module or attribute is unknown, or the attribute is not a function.
    pub fn get_endpoint_handler(&self, reference: &str) -> Result<Callable, InvalidHandlerFunction> {
        let fail = |reason| InvalidHandlerFunction {
            reference: reference.to_string(),
            reason,
        };
        let (module, attribute) = reference
            .rsplit_once('.')
            .filter(|(m, a)| !m.is_empty() && !a.is_empty())
            .ok_or_else(|| fail(ResolveFailure::MalformedReference))?;
        let exports = self
            .modules
            .get(module)
            .ok_or_else(|| fail(ResolveFailure::UnknownModule))?;
        match exports.get(attribute) {
            Some(Export::Function(callable)) => Ok(callable.clone()),
            Some(Export::Value(_)) => Err(fail(ResolveFailure::NotCallable)),
            None => Err(fail(ResolveFailure::UnknownAttribute)),
        }
    }
}

/// Free-function form of [`HandlerCatalog::get_endpoint_handler`].
///
/// # Errors
///
/// See [`HandlerCatalog::get_endpoint_handler`].
pub fn get_endpoint_handler(
    catalog: &HandlerCatalog,
    reference: &str,
) -> Result<Callable, InvalidHandlerFunction> {
    catalog.get_endpoint_handler(reference)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    fn execute_addition(x: i64, y: i64) -> i64 {
        x + y
    }

    fn catalog() -> (HandlerCatalog, Callable) {
        let add = Callable::new("execute_addition", &["x", "y"], execute_addition);
        let catalog = HandlerCatalog::new()
            .with_function("tests.cli.files.sample", add.clone())
            .with_value("tests.cli.files.sample", "NOT_A_FUNCTION", json!(42));
        (catalog, add)
    }

    #[test]
    fn test_resolves_identical_callable() {
        let (catalog, add) = catalog();
        let found = get_endpoint_handler(&catalog, "tests.cli.files.sample.execute_addition").unwrap();
        assert!(Callable::ptr_eq(&found, &add));
    }

    #[test]
    fn test_resolution_failures() {
        let (catalog, _) = catalog();
        let reason = |r: &str| catalog.get_endpoint_handler(r).unwrap_err().reason;
        assert_eq!(reason("tests.cli.files.sample.NOT_A_FUNCTION"), ResolveFailure::NotCallable);
        assert_eq!(reason("tests.cli.files.sample.missing"), ResolveFailure::UnknownAttribute);
        assert_eq!(reason("tests.nowhere.execute_addition"), ResolveFailure::UnknownModule);
        assert_eq!(reason("execute_addition"), ResolveFailure::MalformedReference);
        assert_eq!(reason("tests."), ResolveFailure::MalformedReference);
    }

    #[test]
    fn test_function_references() {
        let (catalog, _) = catalog();
        let refs: Vec<String> = catalog.function_references().collect();
        assert_eq!(refs, ["tests.cli.files.sample.execute_addition"]);
    }
}
