//! # Types Module
//!
//! Static type descriptors for endpoint functions and the eligibility rules
//! that decide which functions can become endpoints.
//!
//! ## Overview
//!
//! Every parameter and return type of an endpoint function reflects into a
//! [`TypeDescriptor`] through the [`Reflect`] trait. The descriptor is built
//! once when the function is wrapped in a [`Callable`](crate::Callable) and
//! drives everything downstream: eligibility checks, JSON Schema synthesis,
//! and query-string coercion.
//!
//! ## Eligible Types
//!
//! | Rust type | Descriptor | Eligible |
//! |-----------|------------|----------|
//! | `i64`, `u32`, ... | `Integer` | yes |
//! | `f64`, `f32` | `Float` | yes |
//! | `String`, `char` | `String` | yes |
//! | `bool` | `Boolean` | yes |
//! | `Vec<T>` | `Sequence(T)` | when `T` is |
//! | `HashMap<String, V>` | `Mapping(String, V)` | when `V` is |
//! | `#[derive(Record)]` structs | `Record` | always |
//! | tuples, sets, `Option<T>` | | no |
//! | `serde_json::Value` | `Any` | only inside containers |
//!
//! ## Records
//!
//! ```rust,ignore
//! use serde::{Deserialize, Serialize};
//! use tapi::Record;
//!
//! #[derive(Serialize, Deserialize, Record)]
//! struct Point {
//!     x: f64,
//!     y: f64,
//! }
//! ```

mod descriptor;
mod eligibility;
mod reflect;
mod signature;

pub use descriptor::{FieldDescriptor, RecordDescriptor, TypeDescriptor};
pub use eligibility::{is_allowed_type, validate_callable, validate_signature};
pub use reflect::{Record, Reflect};
pub use signature::{FunctionSignature, Parameter, SignatureBuilder};
