//! Static type tags and function signatures
//!
//! A `Signature` is derived once from the Rust types of a bound function
//! (through [`NativeType`](crate::convert::NativeType)) and never changes
//! afterwards.

use std::fmt;

/// Static type of a parameter or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `()`
    Unit,
    /// `bool`
    Bool,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `i128`
    I128,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `char`
    Char,
    /// Length-prefixed string (`String`, `&'static str`, ...)
    Str,
    /// Null-terminated string (`CString`, `&'static CStr`)
    CStr,
    /// Opaque host handle
    Handle,
    /// `Option<T>` of any supported `T`
    Optional,
    /// `DynValue` passed through untouched
    Dynamic,
}

impl TypeTag {
    /// Rust spelling of the type
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Unit => "()",
            TypeTag::Bool => "bool",
            TypeTag::I8 => "i8",
            TypeTag::I16 => "i16",
            TypeTag::I32 => "i32",
            TypeTag::I64 => "i64",
            TypeTag::I128 => "i128",
            TypeTag::Isize => "isize",
            TypeTag::U8 => "u8",
            TypeTag::U16 => "u16",
            TypeTag::U32 => "u32",
            TypeTag::U64 => "u64",
            TypeTag::U128 => "u128",
            TypeTag::Usize => "usize",
            TypeTag::F32 => "f32",
            TypeTag::F64 => "f64",
            TypeTag::Char => "char",
            TypeTag::Str => "str",
            TypeTag::CStr => "cstr",
            TypeTag::Handle => "handle",
            TypeTag::Optional => "option",
            TypeTag::Dynamic => "any",
        }
    }

    /// Integral types (decoded from the `Int` tag)
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            TypeTag::I8
                | TypeTag::I16
                | TypeTag::I32
                | TypeTag::I64
                | TypeTag::I128
                | TypeTag::Isize
                | TypeTag::U8
                | TypeTag::U16
                | TypeTag::U32
                | TypeTag::U64
                | TypeTag::U128
                | TypeTag::Usize
        )
    }

    /// Floating-point types (decoded from the `Float` tag)
    pub const fn is_float(self) -> bool {
        matches!(self, TypeTag::F32 | TypeTag::F64)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Return type plus ordered parameter types of a bound function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    ret: TypeTag,
    params: Box<[TypeTag]>,
}

impl Signature {
    /// Build a signature
    pub fn new(ret: TypeTag, params: impl Into<Box<[TypeTag]>>) -> Self {
        Self {
            ret,
            params: params.into(),
        }
    }

    /// Return type
    #[inline]
    pub fn return_type(&self) -> TypeTag {
        self.ret
    }

    /// Parameter types in declaration order
    #[inline]
    pub fn params(&self) -> &[TypeTag] {
        &self.params
    }

    /// Number of positional parameters
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// True when the function returns `()`
    #[inline]
    pub fn is_void(&self) -> bool {
        self.ret == TypeTag::Unit
    }

    /// Render as `name(p0, p1) -> ret`
    pub fn render(&self, name: &str) -> String {
        let params: Vec<&str> = self.params.iter().map(|p| p.name()).collect();
        if self.is_void() {
            format!("{}({})", name, params.join(", "))
        } else {
            format!("{}({}) -> {}", name, params.join(", "), self.ret)
        }
    }
}
