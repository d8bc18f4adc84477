//! Rebind SDK - Expose native Rust functions to a dynamic host runtime
//!
//! This crate provides the runtime half of the binding layer: the dynamic
//! value model, marshaling between native and dynamic values, type-erased
//! callables, and the module registry that installs them into a host.
//!
//! Function tables are normally generated by `#[rebind_native::entity]`,
//! which walks an inline module at build time and emits one
//! [`Entity`] static for it.
//!
//! # Example
//!
//! ```ignore
//! use rebind_sdk::{init_module, BindingOptions, DynValue, LocalHost};
//! use rebind_native::entity;
//!
//! #[entity(name = "math")]
//! pub mod math {
//!     /// Adds two numbers.
//!     pub fn sum(a: i32, b: i32) -> i32 {
//!         a + b
//!     }
//! }
//!
//! let host = LocalHost::new();
//! let module = init_module(&host, "math", &math::REBIND_ENTITY, BindingOptions::default())?;
//! let five = module.function("sum")?.call(&[DynValue::long(2), DynValue::long(3)])?;
//! ```

#![warn(missing_docs)]

mod callable;
mod config;
mod convert;
mod entity;
mod error;
mod host;
mod registry;
mod types;
mod value;

pub use callable::{Callable, Keywords, NativeFunction, MAX_ARITY};
pub use config::{BindingOptions, Narrowing};
pub use convert::{FromDynamic, NativeType, ToDynamic};
pub use entity::{Binder, Entity, Member, MemberKind};
pub use error::{CallError, CallResult, ErrorKind, HostError, ModuleError};
pub use host::{Attribute, HostFunction, HostModule, HostRuntime, LocalHost, ModuleObject};
pub use registry::{init_module, ModuleRegistry};
pub use types::{Signature, TypeTag};
pub use value::{ArgumentList, DynValue, Handle, Integer};
