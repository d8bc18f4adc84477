//! Callable — one bound native function behind a uniform entry point
//!
//! A [`Callable`] pairs an immutable descriptor (name, doc, signature) with a
//! boxed thunk specialized for the bound function's Rust signature. Every
//! call runs the same sequence:
//!
//! ```text
//! Idle -> ArityCheck -> Decoding -> Invoking -> Encoding -> Idle
//!             |            |           |           |
//!             +------------+-----------+-----------+--> Error
//! ```
//!
//! The native function runs at most once per call, and never when the
//! arity check or any argument decoding fails. Panics raised while it runs
//! are caught and reported as [`CallError::NativeFault`].
//!
//! Catching does not silence the process panic hook: unless the host
//! installs its own hook, every faulting call still prints the usual
//! "thread '..' panicked at" message to stderr.

use std::borrow::Cow;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::config::BindingOptions;
use crate::convert::{FromDynamic, NativeType, ToDynamic};
use crate::error::{CallError, CallResult};
use crate::types::Signature;
use crate::value::{ArgumentList, DynValue};

/// Keyword arguments as passed by a host calling convention.
pub type Keywords = [(String, DynValue)];

/// Uniform entry point stored in every descriptor.
type Thunk = dyn Fn(&ArgumentList, &BindingOptions) -> CallResult<DynValue> + Send + Sync;

/// Largest supported arity
pub const MAX_ARITY: usize = 8;

// ============================================================================
// NativeFunction
// ============================================================================

/// A Rust function that can be bound as a [`Callable`].
///
/// Implemented for every `Fn(A0, .., An) -> R` with up to [`MAX_ARITY`]
/// parameters whose types implement [`FromDynamic`] and whose return type
/// implements [`ToDynamic`]. `Args` is the parameter tuple and only serves
/// to keep the per-arity impls apart.
pub trait NativeFunction<Args>: Send + Sync + 'static {
    /// Native return type
    type Output: ToDynamic;

    /// Signature derived from the parameter and return types
    fn signature() -> Signature;

    /// Decode every positional argument, left to right, stopping at the
    /// first failure.
    fn decode(args: &ArgumentList, options: &BindingOptions) -> CallResult<Args>;

    /// Call the function with decoded arguments
    fn apply(&self, args: Args) -> Self::Output;
}

macro_rules! impl_native_function {
    ($arity:literal; $($ty:ident $var:ident $idx:tt),*) => {
        impl<F, R, $($ty,)*> NativeFunction<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            R: ToDynamic,
            $($ty: FromDynamic,)*
        {
            type Output = R;

            fn signature() -> Signature {
                Signature::new(<R as NativeType>::TYPE, vec![$(<$ty as NativeType>::TYPE),*])
            }

            #[allow(unused_variables)]
            fn decode(args: &ArgumentList, options: &BindingOptions) -> CallResult<($($ty,)*)> {
                let [$($var),*] = args else {
                    return Err(CallError::ArgumentCountMismatch {
                        function: "",
                        expected: $arity,
                        got: args.len(),
                    });
                };
                Ok(($(
                    <$ty as FromDynamic>::from_dynamic($var, options)
                        .map_err(|e| e.at_index($idx))?,
                )*))
            }

            #[inline]
            fn apply(&self, ($($var,)*): ($($ty,)*)) -> R {
                (self)($($var),*)
            }
        }
    };
}

impl_native_function!(0;);
impl_native_function!(1; A0 a0 0);
impl_native_function!(2; A0 a0 0, A1 a1 1);
impl_native_function!(3; A0 a0 0, A1 a1 1, A2 a2 2);
impl_native_function!(4; A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3);
impl_native_function!(5; A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3, A4 a4 4);
impl_native_function!(6; A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3, A4 a4 4, A5 a5 5);
impl_native_function!(7; A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3, A4 a4 4, A5 a5 5, A6 a6 6);
impl_native_function!(8; A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3, A4 a4 4, A5 a5 5, A6 a6 6, A7 a7 7);

// ============================================================================
// Callable
// ============================================================================

/// Immutable descriptor of one exposed function plus its thunk.
pub struct Callable {
    name: &'static str,
    doc: Cow<'static, str>,
    signature: Signature,
    thunk: Box<Thunk>,
}

impl Callable {
    /// Bind `f` under `name`.
    ///
    /// An empty `doc` is replaced by the rendered signature, e.g.
    /// `sum(i32, i32) -> i32`.
    pub fn new<F, Args>(name: &'static str, doc: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: NativeFunction<Args>,
        Args: 'static,
    {
        let signature = F::signature();
        let doc = doc.into();
        let doc = if doc.trim().is_empty() {
            Cow::Owned(signature.render(name))
        } else {
            doc
        };

        let thunk = move |args: &ArgumentList, options: &BindingOptions| -> CallResult<DynValue> {
            let decoded = F::decode(args, options)?;
            let output = catch_unwind(AssertUnwindSafe(|| f.apply(decoded))).map_err(|panic| {
                CallError::NativeFault {
                    function: name,
                    message: panic_message(panic.as_ref()),
                }
            })?;
            output.to_dynamic()
        };

        Callable {
            name,
            doc,
            signature,
            thunk: Box::new(thunk),
        }
    }

    /// Exposed name
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Doc string
    #[inline]
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Bound signature
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Number of positional parameters
    #[inline]
    pub fn arity(&self) -> usize {
        self.signature.arity()
    }

    /// Generic invoke entry point.
    ///
    /// Keyword arguments are rejected; the arity check runs before any
    /// decoding, so a rejected call never reaches the native function.
    pub fn invoke(
        &self,
        args: &ArgumentList,
        kwargs: &Keywords,
        options: &BindingOptions,
    ) -> CallResult<DynValue> {
        tracing::trace!(function = self.name, argc = args.len(), "invoke");

        let result = self.run(args, kwargs, options);
        if let Err(error) = &result {
            tracing::debug!(function = self.name, kind = ?error.kind(), %error, "call failed");
        }
        result
    }

    /// Positional call with default options
    pub fn call(&self, args: &ArgumentList) -> CallResult<DynValue> {
        self.invoke(args, &[], &BindingOptions::default())
    }

    fn run(
        &self,
        args: &ArgumentList,
        kwargs: &Keywords,
        options: &BindingOptions,
    ) -> CallResult<DynValue> {
        if !kwargs.is_empty() {
            return Err(CallError::KeywordArgumentsUnsupported {
                function: self.name,
                names: kwargs.iter().map(|(k, _)| k.clone()).collect(),
            });
        }

        if args.len() != self.signature.arity() {
            return Err(CallError::ArgumentCountMismatch {
                function: self.name,
                expected: self.signature.arity(),
                got: args.len(),
            });
        }

        (self.thunk)(args, options).map_err(|e| e.in_function(self.name))
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
