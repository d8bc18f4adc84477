//! DynValue — the tagged value that crosses the native/dynamic boundary
//!
//! Every value handed to or returned from a bound native function is one of
//! six mutually exclusive tags:
//!
//! ```text
//! None    the "no value" sentinel (void returns, absent options)
//! Bool    true / false
//! Int     integer, carrying the width it was produced with (see `Integer`)
//! Float   IEEE 754 double
//! Str     owned UTF-8 string
//! Handle  opaque 64-bit token owned by the host
//! ```
//!
//! Integers of every width share the single `Int` tag. The width is kept as
//! a representation detail so conversions stay lossless; comparisons between
//! two `Int` values look at the mathematical value only.

use std::fmt;

// ============================================================================
// Integer
// ============================================================================

/// Width-tagged integer payload of [`DynValue::Int`].
///
/// `Long` is the generic signed representation used when a native integer
/// type has no exact-width counterpart (i8, i16, u8, u16).
#[derive(Clone, Copy)]
pub enum Integer {
    /// 32-bit signed
    I32(i32),
    /// 32-bit unsigned
    U32(u32),
    /// 64-bit signed
    I64(i64),
    /// 64-bit unsigned
    U64(u64),
    /// Pointer-width signed
    Isize(isize),
    /// Pointer-width unsigned
    Usize(usize),
    /// Generic signed fallback
    Long(i64),
}

impl Integer {
    /// Widen to i128, which holds every representation losslessly.
    #[inline]
    pub const fn to_i128(self) -> i128 {
        match self {
            Integer::I32(v) => v as i128,
            Integer::U32(v) => v as i128,
            Integer::I64(v) => v as i128,
            Integer::U64(v) => v as i128,
            Integer::Isize(v) => v as i128,
            Integer::Usize(v) => v as i128,
            Integer::Long(v) => v as i128,
        }
    }

    /// Name of the width representation
    pub const fn width_name(self) -> &'static str {
        match self {
            Integer::I32(_) => "i32",
            Integer::U32(_) => "u32",
            Integer::I64(_) => "i64",
            Integer::U64(_) => "u64",
            Integer::Isize(_) => "isize",
            Integer::Usize(_) => "usize",
            Integer::Long(_) => "long",
        }
    }
}

impl PartialEq for Integer {
    fn eq(&self, other: &Self) -> bool {
        self.to_i128() == other.to_i128()
    }
}

impl Eq for Integer {}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.width_name(), self.to_i128())
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_i128())
    }
}

// ============================================================================
// Handle
// ============================================================================

/// Opaque token for a host-owned object.
///
/// The marshaling layer never dereferences a handle; it only carries it
/// across the boundary unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Handle(u64);

impl Handle {
    /// Wrap a raw token
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw token value
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

// ============================================================================
// DynValue
// ============================================================================

/// Tagged dynamic value.
#[derive(Clone, PartialEq, Default)]
pub enum DynValue {
    /// No value
    #[default]
    None,
    /// Boolean
    Bool(bool),
    /// Integer of any width
    Int(Integer),
    /// Floating point
    Float(f64),
    /// Owned UTF-8 string
    Str(String),
    /// Opaque host handle
    Handle(Handle),
}

/// Positional arguments of one call, in call order.
pub type ArgumentList = [DynValue];

impl DynValue {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a boolean value
    #[inline]
    pub const fn bool(b: bool) -> Self {
        DynValue::Bool(b)
    }

    /// Create an i32 value
    #[inline]
    pub const fn i32(i: i32) -> Self {
        DynValue::Int(Integer::I32(i))
    }

    /// Create an i64 value
    #[inline]
    pub const fn i64(i: i64) -> Self {
        DynValue::Int(Integer::I64(i))
    }

    /// Create a u32 value
    #[inline]
    pub const fn u32(u: u32) -> Self {
        DynValue::Int(Integer::U32(u))
    }

    /// Create a u64 value
    #[inline]
    pub const fn u64(u: u64) -> Self {
        DynValue::Int(Integer::U64(u))
    }

    /// Create a value in the generic signed representation
    #[inline]
    pub const fn long(i: i64) -> Self {
        DynValue::Int(Integer::Long(i))
    }

    /// Create a float value
    #[inline]
    pub const fn float(f: f64) -> Self {
        DynValue::Float(f)
    }

    /// Create a string value (copies the input)
    #[inline]
    pub fn str(s: &str) -> Self {
        DynValue::Str(s.to_owned())
    }

    /// Create a handle value
    #[inline]
    pub const fn handle(raw: u64) -> Self {
        DynValue::Handle(Handle::new(raw))
    }

    // ========================================================================
    // Type checks
    // ========================================================================

    /// Check if this is the "no value" sentinel
    #[inline]
    pub const fn is_none(&self) -> bool {
        matches!(self, DynValue::None)
    }

    /// Check if value is a boolean
    #[inline]
    pub const fn is_bool(&self) -> bool {
        matches!(self, DynValue::Bool(_))
    }

    /// Check if value is an integer
    #[inline]
    pub const fn is_int(&self) -> bool {
        matches!(self, DynValue::Int(_))
    }

    /// Check if value is a float
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, DynValue::Float(_))
    }

    /// Check if value is a string
    #[inline]
    pub const fn is_str(&self) -> bool {
        matches!(self, DynValue::Str(_))
    }

    // ========================================================================
    // Extractors
    // ========================================================================

    /// Extract boolean value
    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            DynValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract integer payload
    #[inline]
    pub const fn as_integer(&self) -> Option<Integer> {
        match self {
            DynValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract integer value as i64 if it fits
    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(|i| i64::try_from(i.to_i128()).ok())
    }

    /// Extract float value
    #[inline]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            DynValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract string value
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Extract handle value
    #[inline]
    pub const fn as_handle(&self) -> Option<Handle> {
        match self {
            DynValue::Handle(h) => Some(*h),
            _ => None,
        }
    }

    /// Get type name for diagnostics
    pub const fn type_name(&self) -> &'static str {
        match self {
            DynValue::None => "none",
            DynValue::Bool(_) => "bool",
            DynValue::Int(_) => "int",
            DynValue::Float(_) => "float",
            DynValue::Str(_) => "str",
            DynValue::Handle(_) => "handle",
        }
    }
}

impl fmt::Debug for DynValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynValue::None => write!(f, "DynValue::None"),
            DynValue::Bool(b) => write!(f, "DynValue::Bool({})", b),
            DynValue::Int(i) => write!(f, "DynValue::Int({:?})", i),
            DynValue::Float(x) => write!(f, "DynValue::Float({})", x),
            DynValue::Str(s) => write!(f, "DynValue::Str({:?})", s),
            DynValue::Handle(h) => write!(f, "DynValue::Handle({:#x})", h.raw()),
        }
    }
}

impl fmt::Display for DynValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynValue::None => write!(f, "None"),
            DynValue::Bool(true) => write!(f, "True"),
            DynValue::Bool(false) => write!(f, "False"),
            DynValue::Int(i) => write!(f, "{}", i),
            DynValue::Float(x) => write!(f, "{:?}", x),
            DynValue::Str(s) => write!(f, "{:?}", s),
            DynValue::Handle(h) => write!(f, "<handle {:#x}>", h.raw()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_default() {
        let v = DynValue::default();
        assert!(v.is_none());
        assert!(!v.is_int());
        assert_eq!(v.type_name(), "none");
    }

    #[test]
    fn test_bool_is_not_int() {
        let t = DynValue::bool(true);
        assert_eq!(t.as_bool(), Some(true));
        assert!(t.as_integer().is_none());
        assert!(!t.is_int());
    }

    #[test]
    fn test_integer_equality_ignores_width() {
        assert_eq!(DynValue::i32(5), DynValue::long(5));
        assert_eq!(DynValue::u64(7), DynValue::i64(7));
        assert_ne!(DynValue::i32(-1), DynValue::u32(u32::MAX));
    }

    #[test]
    fn test_int_and_float_never_compare_equal() {
        assert_ne!(DynValue::i32(1), DynValue::float(1.0));
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(DynValue::u32(12345).as_i64(), Some(12345));
        assert_eq!(DynValue::u64(u64::MAX).as_i64(), None);
        assert_eq!(DynValue::str("1").as_i64(), None);
    }

    #[test]
    fn test_str_is_copied() {
        let source = String::from("hello");
        let v = DynValue::str(&source);
        drop(source);
        assert_eq!(v.as_str(), Some("hello"));
    }

    #[test]
    fn test_handle() {
        let v = DynValue::handle(0xdead);
        assert_eq!(v.as_handle().map(Handle::raw), Some(0xdead));
        assert_eq!(v.type_name(), "handle");
    }

    #[test]
    fn test_debug_format() {
        let s = format!("{:?}", DynValue::i32(42));
        assert!(s.contains("42"));
        assert!(s.contains("i32"));
    }

    #[test]
    fn test_display_format() {
        assert_eq!(DynValue::None.to_string(), "None");
        assert_eq!(DynValue::bool(false).to_string(), "False");
        assert_eq!(DynValue::long(-3).to_string(), "-3");
        assert_eq!(DynValue::float(2.5).to_string(), "2.5");
        assert_eq!(DynValue::str("hi").to_string(), "\"hi\"");
    }
}
