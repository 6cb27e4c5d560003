//! `IntoCallable` implementations for plain Rust functions.
//!
//! One impl per (arity, shape). The marker type parameter keeps the four
//! shapes apart so that a function's return type alone selects the impl.

use super::{Arguments, Callable, Invocation, InvocationError};
use crate::types::{FunctionSignature, Parameter, Reflect, TypeDescriptor};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Marker types distinguishing the supported function shapes.
pub mod markers {
    /// `Fn(..) -> R`
    pub struct Returns;
    /// `Fn(..) -> Result<R, E>`
    pub struct TryReturns;
    /// `Fn(..) -> impl Future<Output = R>`
    pub struct Awaits;
    /// `Fn(..) -> impl Future<Output = Result<R, E>>`
    pub struct TryAwaits;
}

/// Functions that can be turned into a [`Callable`].
pub trait IntoCallable<Args, Marker>: Send + Sync + Sized + 'static {
    fn into_callable(self, name: String, params: &[&str]) -> Callable;
}

fn signature_of<R: Reflect>(params: &[&str], types: Vec<TypeDescriptor>) -> FunctionSignature {
    let arity = types.len();
    let parameters = params
        .iter()
        .zip(types.into_iter().map(Some).chain(std::iter::repeat(None)))
        .map(|(name, ty)| Parameter::new(*name, ty.filter(TypeDescriptor::is_declared)))
        .collect();
    let returns = Some(R::descriptor()).filter(TypeDescriptor::is_declared);
    FunctionSignature::new(parameters, returns).with_arity(arity)
}

fn take_argument<T: DeserializeOwned>(
    args: &mut Arguments,
    names: &[String],
    position: &mut usize,
) -> Result<T, InvocationError> {
    let index = *position;
    *position += 1;
    let name = names
        .get(index)
        .ok_or_else(|| InvocationError::BadArgument {
            name: format!("#{index}"),
            reason: "parameter has no name".to_string(),
        })?;
    let value = args.remove(name).unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|err| InvocationError::BadArgument {
        name: name.clone(),
        reason: err.to_string(),
    })
}

fn to_value<R: Serialize>(result: R) -> Result<Value, InvocationError> {
    serde_json::to_value(result).map_err(|err| InvocationError::Unserializable(err.to_string()))
}

fn raised<E: Into<anyhow::Error>>(err: E) -> InvocationError {
    InvocationError::Raised(err.into())
}

macro_rules! impl_into_callable {
    ($($ty:ident),*) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<F, R, $($ty,)*> IntoCallable<($($ty,)*), markers::Returns> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            R: Reflect + Serialize,
            $($ty: Reflect + DeserializeOwned + Send + 'static,)*
        {
            fn into_callable(self, name: String, params: &[&str]) -> Callable {
                let signature = signature_of::<R>(params, vec![$(<$ty as Reflect>::descriptor()),*]);
                let names: Arc<[String]> = params.iter().map(|p| p.to_string()).collect();
                let func = Arc::new(self);
                Callable::from_parts(name, signature, move |mut args: Arguments| -> Invocation {
                    let func = Arc::clone(&func);
                    let names = Arc::clone(&names);
                    Box::pin(async move {
                        let mut position = 0usize;
                        $(let $ty: $ty = take_argument(&mut args, &names, &mut position)?;)*
                        to_value(func($($ty),*))
                    })
                })
            }
        }

        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<F, R, E, $($ty,)*> IntoCallable<($($ty,)*), markers::TryReturns> for F
        where
            F: Fn($($ty),*) -> Result<R, E> + Send + Sync + 'static,
            R: Reflect + Serialize,
            E: Into<anyhow::Error>,
            $($ty: Reflect + DeserializeOwned + Send + 'static,)*
        {
            fn into_callable(self, name: String, params: &[&str]) -> Callable {
                let signature = signature_of::<R>(params, vec![$(<$ty as Reflect>::descriptor()),*]);
                let names: Arc<[String]> = params.iter().map(|p| p.to_string()).collect();
                let func = Arc::new(self);
                Callable::from_parts(name, signature, move |mut args: Arguments| -> Invocation {
                    let func = Arc::clone(&func);
                    let names = Arc::clone(&names);
                    Box::pin(async move {
                        let mut position = 0usize;
                        $(let $ty: $ty = take_argument(&mut args, &names, &mut position)?;)*
                        to_value(func($($ty),*).map_err(raised)?)
                    })
                })
            }
        }

        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<F, Fut, R, $($ty,)*> IntoCallable<($($ty,)*), markers::Awaits> for F
        where
            F: Fn($($ty),*) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: Reflect + Serialize,
            $($ty: Reflect + DeserializeOwned + Send + 'static,)*
        {
            fn into_callable(self, name: String, params: &[&str]) -> Callable {
                let signature = signature_of::<R>(params, vec![$(<$ty as Reflect>::descriptor()),*]);
                let names: Arc<[String]> = params.iter().map(|p| p.to_string()).collect();
                let func = Arc::new(self);
                Callable::from_parts(name, signature, move |mut args: Arguments| -> Invocation {
                    let func = Arc::clone(&func);
                    let names = Arc::clone(&names);
                    Box::pin(async move {
                        let mut position = 0usize;
                        $(let $ty: $ty = take_argument(&mut args, &names, &mut position)?;)*
                        let pending = func($($ty),*);
                        to_value(pending.await)
                    })
                })
            }
        }

        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<F, Fut, R, E, $($ty,)*> IntoCallable<($($ty,)*), markers::TryAwaits> for F
        where
            F: Fn($($ty),*) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = Result<R, E>> + Send + 'static,
            R: Reflect + Serialize,
            E: Into<anyhow::Error>,
            $($ty: Reflect + DeserializeOwned + Send + 'static,)*
        {
            fn into_callable(self, name: String, params: &[&str]) -> Callable {
                let signature = signature_of::<R>(params, vec![$(<$ty as Reflect>::descriptor()),*]);
                let names: Arc<[String]> = params.iter().map(|p| p.to_string()).collect();
                let func = Arc::new(self);
                Callable::from_parts(name, signature, move |mut args: Arguments| -> Invocation {
                    let func = Arc::clone(&func);
                    let names = Arc::clone(&names);
                    Box::pin(async move {
                        let mut position = 0usize;
                        $(let $ty: $ty = take_argument(&mut args, &names, &mut position)?;)*
                        let pending = func($($ty),*);
                        to_value(pending.await.map_err(raised)?)
                    })
                })
            }
        }
    };
}

impl_into_callable!();
impl_into_callable!(A1);
impl_into_callable!(A1, A2);
impl_into_callable!(A1, A2, A3);
impl_into_callable!(A1, A2, A3, A4);
impl_into_callable!(A1, A2, A3, A4, A5);
impl_into_callable!(A1, A2, A3, A4, A5, A6);
