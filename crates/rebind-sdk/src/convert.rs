//! Value marshaling between native Rust types and [`DynValue`].
//!
//! Native → dynamic dispatch is by the static Rust type ([`ToDynamic`]).
//! Dynamic → native dispatch is by the requested target type
//! ([`FromDynamic`]). A type with no impl cannot be bound at all, so no
//! zero value is ever fabricated for an unsupported target.
//!
//! | Rust type                               | Dynamic tag                 |
//! |-----------------------------------------|-----------------------------|
//! | `bool`                                  | `Bool`                      |
//! | `i32` `u32` `i64` `u64` `isize` `usize` | `Int` (same width)          |
//! | `i8` `i16` `u8` `u16`                   | `Int` (`Long`)              |
//! | `i128` / `u128`                         | `Int` (`Long` / `U64`) if it fits |
//! | `f32` `f64`                             | `Float`                     |
//! | `String` `&str` `Box<str>` `Cow<str>` `char` | `Str` (copied)         |
//! | `CString` `&CStr`                       | `Str` if valid UTF-8        |
//! | `Handle`                                | `Handle`                    |
//! | `()`                                    | `None`                      |
//!
//! Integer narrowing on the way in follows [`Narrowing`]: `Wrap` truncates
//! like an `as` cast, `Checked` rejects values the target cannot hold.

use std::borrow::Cow;
use std::ffi::{CStr, CString};

use az::{CheckedCast, WrappingCast};

use crate::config::{BindingOptions, Narrowing};
use crate::error::{CallError, CallResult};
use crate::types::TypeTag;
use crate::value::{DynValue, Handle, Integer};

// ============================================================================
// Traits
// ============================================================================

/// Static type tag of a marshalable type.
pub trait NativeType {
    /// Tag used in signatures
    const TYPE: TypeTag;
}

/// Convert from a dynamic value to a native parameter type.
pub trait FromDynamic: NativeType + Sized {
    /// Decode `value`, failing with `ArgumentTypeMismatch` on a tag mismatch.
    fn from_dynamic(value: &DynValue, options: &BindingOptions) -> CallResult<Self>;
}

/// Convert a native return value to a dynamic value.
pub trait ToDynamic: NativeType {
    /// Encode `self`, failing with `ConversionFailure` when the value has no
    /// dynamic representation.
    fn to_dynamic(self) -> CallResult<DynValue>;
}

fn mismatch<T: NativeType>(value: &DynValue) -> CallError {
    CallError::type_mismatch(T::TYPE, value.type_name())
}

// ============================================================================
// Integers
// ============================================================================

fn narrow<T>(integer: Integer, options: &BindingOptions) -> CallResult<T>
where
    T: NativeType,
    i128: CheckedCast<T> + WrappingCast<T>,
{
    let wide = integer.to_i128();
    match options.narrowing {
        Narrowing::Wrap => Ok(wide.wrapping_cast()),
        Narrowing::Checked => wide
            .checked_cast()
            .ok_or_else(|| CallError::type_mismatch(T::TYPE, format!("int {} out of range", wide))),
    }
}

macro_rules! impl_integer {
    ($($ty:ty => $tag:ident, |$v:ident| $encode:expr;)*) => {
        $(
            impl NativeType for $ty {
                const TYPE: TypeTag = TypeTag::$tag;
            }

            impl FromDynamic for $ty {
                fn from_dynamic(value: &DynValue, options: &BindingOptions) -> CallResult<Self> {
                    match value {
                        DynValue::Int(integer) => narrow(*integer, options),
                        other => Err(mismatch::<$ty>(other)),
                    }
                }
            }

            impl ToDynamic for $ty {
                #[inline]
                fn to_dynamic(self) -> CallResult<DynValue> {
                    let $v = self;
                    Ok(DynValue::Int($encode))
                }
            }
        )*
    };
}

impl_integer! {
    i8 => I8, |v| Integer::Long(v as i64);
    i16 => I16, |v| Integer::Long(v as i64);
    i32 => I32, |v| Integer::I32(v);
    i64 => I64, |v| Integer::I64(v);
    isize => Isize, |v| Integer::Isize(v);
    u8 => U8, |v| Integer::Long(v as i64);
    u16 => U16, |v| Integer::Long(v as i64);
    u32 => U32, |v| Integer::U32(v);
    u64 => U64, |v| Integer::U64(v);
    usize => Usize, |v| Integer::Usize(v);
}

impl NativeType for i128 {
    const TYPE: TypeTag = TypeTag::I128;
}

impl FromDynamic for i128 {
    fn from_dynamic(value: &DynValue, _options: &BindingOptions) -> CallResult<Self> {
        value
            .as_integer()
            .map(Integer::to_i128)
            .ok_or_else(|| mismatch::<i128>(value))
    }
}

impl ToDynamic for i128 {
    fn to_dynamic(self) -> CallResult<DynValue> {
        i64::try_from(self)
            .map(DynValue::long)
            .map_err(|_| CallError::conversion(format!("i128 value {} exceeds 64 bits", self)))
    }
}

impl NativeType for u128 {
    const TYPE: TypeTag = TypeTag::U128;
}

impl FromDynamic for u128 {
    fn from_dynamic(value: &DynValue, options: &BindingOptions) -> CallResult<Self> {
        match value {
            DynValue::Int(integer) => narrow(*integer, options),
            other => Err(mismatch::<u128>(other)),
        }
    }
}

impl ToDynamic for u128 {
    fn to_dynamic(self) -> CallResult<DynValue> {
        u64::try_from(self)
            .map(DynValue::u64)
            .map_err(|_| CallError::conversion(format!("u128 value {} exceeds 64 bits", self)))
    }
}

// ============================================================================
// Floats
// ============================================================================

impl NativeType for f64 {
    const TYPE: TypeTag = TypeTag::F64;
}

impl FromDynamic for f64 {
    fn from_dynamic(value: &DynValue, _options: &BindingOptions) -> CallResult<Self> {
        value.as_f64().ok_or_else(|| mismatch::<f64>(value))
    }
}

impl ToDynamic for f64 {
    #[inline]
    fn to_dynamic(self) -> CallResult<DynValue> {
        Ok(DynValue::Float(self))
    }
}

impl NativeType for f32 {
    const TYPE: TypeTag = TypeTag::F32;
}

impl FromDynamic for f32 {
    fn from_dynamic(value: &DynValue, _options: &BindingOptions) -> CallResult<Self> {
        value
            .as_f64()
            .map(|f| f as f32)
            .ok_or_else(|| mismatch::<f32>(value))
    }
}

impl ToDynamic for f32 {
    #[inline]
    fn to_dynamic(self) -> CallResult<DynValue> {
        Ok(DynValue::Float(self as f64))
    }
}

// ============================================================================
// Bool, unit, handle, passthrough
// ============================================================================

impl NativeType for bool {
    const TYPE: TypeTag = TypeTag::Bool;
}

impl FromDynamic for bool {
    fn from_dynamic(value: &DynValue, _options: &BindingOptions) -> CallResult<Self> {
        value.as_bool().ok_or_else(|| mismatch::<bool>(value))
    }
}

impl ToDynamic for bool {
    #[inline]
    fn to_dynamic(self) -> CallResult<DynValue> {
        Ok(DynValue::Bool(self))
    }
}

impl NativeType for () {
    const TYPE: TypeTag = TypeTag::Unit;
}

impl ToDynamic for () {
    #[inline]
    fn to_dynamic(self) -> CallResult<DynValue> {
        Ok(DynValue::None)
    }
}

impl NativeType for Handle {
    const TYPE: TypeTag = TypeTag::Handle;
}

impl FromDynamic for Handle {
    fn from_dynamic(value: &DynValue, _options: &BindingOptions) -> CallResult<Self> {
        value.as_handle().ok_or_else(|| mismatch::<Handle>(value))
    }
}

impl ToDynamic for Handle {
    #[inline]
    fn to_dynamic(self) -> CallResult<DynValue> {
        Ok(DynValue::Handle(self))
    }
}

impl NativeType for DynValue {
    const TYPE: TypeTag = TypeTag::Dynamic;
}

impl FromDynamic for DynValue {
    fn from_dynamic(value: &DynValue, _options: &BindingOptions) -> CallResult<Self> {
        Ok(value.clone())
    }
}

impl ToDynamic for DynValue {
    #[inline]
    fn to_dynamic(self) -> CallResult<DynValue> {
        Ok(self)
    }
}

// ============================================================================
// Strings
// ============================================================================

impl NativeType for String {
    const TYPE: TypeTag = TypeTag::Str;
}

impl FromDynamic for String {
    fn from_dynamic(value: &DynValue, _options: &BindingOptions) -> CallResult<Self> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch::<String>(value))
    }
}

impl ToDynamic for String {
    #[inline]
    fn to_dynamic(self) -> CallResult<DynValue> {
        Ok(DynValue::Str(self))
    }
}

impl NativeType for &str {
    const TYPE: TypeTag = TypeTag::Str;
}

impl ToDynamic for &str {
    #[inline]
    fn to_dynamic(self) -> CallResult<DynValue> {
        Ok(DynValue::str(self))
    }
}

impl NativeType for Box<str> {
    const TYPE: TypeTag = TypeTag::Str;
}

impl ToDynamic for Box<str> {
    #[inline]
    fn to_dynamic(self) -> CallResult<DynValue> {
        Ok(DynValue::Str(self.into_string()))
    }
}

impl NativeType for Cow<'_, str> {
    const TYPE: TypeTag = TypeTag::Str;
}

impl ToDynamic for Cow<'_, str> {
    #[inline]
    fn to_dynamic(self) -> CallResult<DynValue> {
        Ok(DynValue::Str(self.into_owned()))
    }
}

impl NativeType for char {
    const TYPE: TypeTag = TypeTag::Char;
}

impl FromDynamic for char {
    fn from_dynamic(value: &DynValue, _options: &BindingOptions) -> CallResult<Self> {
        let s = value.as_str().ok_or_else(|| mismatch::<char>(value))?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(CallError::type_mismatch(
                TypeTag::Char,
                format!("str of length {}", s.chars().count()),
            )),
        }
    }
}

impl ToDynamic for char {
    fn to_dynamic(self) -> CallResult<DynValue> {
        Ok(DynValue::Str(self.to_string()))
    }
}

impl NativeType for CString {
    const TYPE: TypeTag = TypeTag::CStr;
}

impl ToDynamic for CString {
    fn to_dynamic(self) -> CallResult<DynValue> {
        self.as_c_str().to_dynamic()
    }
}

impl FromDynamic for CString {
    fn from_dynamic(value: &DynValue, _options: &BindingOptions) -> CallResult<Self> {
        let s = value.as_str().ok_or_else(|| mismatch::<CString>(value))?;
        CString::new(s).map_err(|_| CallError::type_mismatch(TypeTag::CStr, "str with interior nul"))
    }
}

impl NativeType for &CStr {
    const TYPE: TypeTag = TypeTag::CStr;
}

impl ToDynamic for &CStr {
    fn to_dynamic(self) -> CallResult<DynValue> {
        self.to_str()
            .map(DynValue::str)
            .map_err(|e| CallError::conversion(format!("C string is not valid UTF-8: {}", e)))
    }
}

// ============================================================================
// Option / Result
// ============================================================================

impl<T: NativeType> NativeType for Option<T> {
    const TYPE: TypeTag = TypeTag::Optional;
}

impl<T: FromDynamic> FromDynamic for Option<T> {
    fn from_dynamic(value: &DynValue, options: &BindingOptions) -> CallResult<Self> {
        match value {
            DynValue::None => Ok(None),
            other => T::from_dynamic(other, options).map(Some),
        }
    }
}

impl<T: ToDynamic> ToDynamic for Option<T> {
    fn to_dynamic(self) -> CallResult<DynValue> {
        match self {
            Some(value) => value.to_dynamic(),
            None => Ok(DynValue::None),
        }
    }
}

impl<T: NativeType, E> NativeType for Result<T, E> {
    const TYPE: TypeTag = T::TYPE;
}

// Err becomes a native fault; the calling thunk fills in the function name.
impl<T: ToDynamic, E: std::fmt::Display> ToDynamic for Result<T, E> {
    fn to_dynamic(self) -> CallResult<DynValue> {
        match self {
            Ok(value) => value.to_dynamic(),
            Err(error) => Err(CallError::NativeFault {
                function: "",
                message: error.to_string(),
            }),
        }
    }
}
