//! # Callable Module
//!
//! Type-erased handles to endpoint functions.
//!
//! A [`Callable`] pairs a function with the [`FunctionSignature`](crate::types::FunctionSignature)
//! reflected from its Rust types, so the schema and endpoint layers can look
//! at parameter names and types without knowing the concrete function.
//!
//! ```rust,ignore
//! use tapi::callable;
//!
//! fn execute_subtraction(x: i64, y: i64) -> i64 {
//!     x - y
//! }
//!
//! let sub = callable!(execute_subtraction, x, y);
//! assert_eq!(sub.name(), "execute_subtraction");
//! ```

mod core;
mod into;

pub use self::core::{Arguments, Callable, Invocation, InvocationError};
pub use self::into::{markers, IntoCallable};

/// Last segment of a stringified path (`"arith :: add"` -> `"add"`).
#[doc(hidden)]
#[must_use]
pub fn short_name(path: &str) -> String {
    path.rsplit("::").next().unwrap_or(path).trim().to_string()
}

/// Wrap a function in a [`Callable`] named after it.
///
/// `callable!(path::to::func, a, b)` is shorthand for
/// `Callable::new("func", &["a", "b"], path::to::func)`.
#[macro_export]
macro_rules! callable {
    ($func:path $(, $param:ident)* $(,)?) => {
        $crate::Callable::new(
            $crate::callable::short_name(stringify!($func)),
            &[$(stringify!($param)),*],
            $func,
        )
    };
}
