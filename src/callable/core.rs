use crate::types::FunctionSignature;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use super::IntoCallable;

/// Validated, named arguments handed to a function (one key per parameter).
pub type Arguments = Map<String, Value>;

/// Future returned by [`Callable::invoke`]: the serialized return value or
/// the reason invocation failed.
pub type Invocation = BoxFuture<'static, Result<Value, InvocationError>>;

type Invoker = dyn Fn(Arguments) -> Invocation + Send + Sync;

/// A function together with its static signature.
///
/// Cloning is cheap and clones share identity (see [`Callable::ptr_eq`]).
#[derive(Clone)]
pub struct Callable {
    inner: Arc<CallableInner>,
}

struct CallableInner {
    name: String,
    signature: FunctionSignature,
    invoker: Box<Invoker>,
}

impl Callable {
    /// Wrap a typed Rust function.
    ///
    /// `params` names the function's parameters in order. Sync and async
    /// functions are accepted, as are functions returning `Result<R, E>`
    /// where `E: Into<anyhow::Error>`.
    ///
    /// ```rust,ignore
    /// fn execute_addition(x: i64, y: i64) -> i64 {
    ///     x + y
    /// }
    ///
    /// let add = Callable::new("execute_addition", &["x", "y"], execute_addition);
    /// ```
    pub fn new<F, Args, M>(name: impl Into<String>, params: &[&str], func: F) -> Self
    where
        F: IntoCallable<Args, M>,
    {
        func.into_callable(name.into(), params)
    }

    /// Build a callable from an explicit signature and a type-erased invoker.
    pub fn from_parts<I>(name: impl Into<String>, signature: FunctionSignature, invoker: I) -> Self
    where
        I: Fn(Arguments) -> Invocation + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(CallableInner {
                name: name.into(),
                signature,
                invoker: Box::new(invoker),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn signature(&self) -> &FunctionSignature {
        &self.inner.signature
    }

    /// Call the function. Panics raised by the function are not caught here.
    pub fn invoke(&self, arguments: Arguments) -> Invocation {
        (self.inner.invoker)(arguments)
    }

    /// Whether two handles refer to the same function object.
    #[must_use]
    pub fn ptr_eq(a: &Callable, b: &Callable) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.inner.name)
            .field("signature", &self.inner.signature)
            .finish_non_exhaustive()
    }
}

/// Why a call did not produce a value.
#[derive(Debug)]
pub enum InvocationError {
    /// An argument could not be converted into the parameter's Rust type
    BadArgument { name: String, reason: String },
    /// The function returned an error
    Raised(anyhow::Error),
    /// The return value could not be serialized to JSON
    Unserializable(String),
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationError::BadArgument { name, reason } => {
                write!(f, "invalid argument '{name}': {reason}")
            }
            InvocationError::Raised(err) => write!(f, "function raised: {err:#}"),
            InvocationError::Unserializable(reason) => {
                write!(f, "return value is not serializable: {reason}")
            }
        }
    }
}

impl std::error::Error for InvocationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvocationError::Raised(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
