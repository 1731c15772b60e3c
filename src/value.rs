//! Leaf values and notation items.
//!
//! This module provides [`Value`], the owned, exactly-typed scalar that a
//! flattened leaf carries, and [`Item`], one `(key, value)` pair of a
//! notation.
//!
//! ## Width fidelity
//!
//! Unlike dynamic value models that collapse every integer to `i64`,
//! [`Value`] keeps a distinct variant per width and signedness. A `u8`
//! field flattens to `Value::U8`, never to a widened `Value::U64`, so a
//! consumer of the notation can recover the exact declared type of every
//! leaf.
//!
//! ## Usage Patterns
//!
//! ```rust
//! use flatnote::Value;
//!
//! let v = Value::from(42u8);
//! assert_eq!(v, Value::U8(42));
//! assert!(!v.is_empty());
//! assert_eq!(Value::from("").is_empty(), true);
//! ```
//!
//! ## Export
//!
//! Both [`Value`] and [`Item`] implement `serde::Serialize` with the
//! exact scalar widths, so a notation can be handed to `serde_json` (or
//! any other serde backend) for key/value export:
//!
//! ```rust
//! use flatnote::Item;
//!
//! let item = Item { key: "planet.mass".into(), value: 1.0f64.into() };
//! let json = serde_json::to_string(&item).unwrap();
//! assert_eq!(json, r#"{"key":"planet.mass","value":1.0}"#);
//! ```

use num_complex::{Complex32, Complex64};
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use std::fmt;

/// One `(path, value)` pair of a notation.
///
/// Items are created at a leaf, or at a subtree short-circuited by a
/// modifier, and are immutable once appended to the output sequence.
///
/// The `Display` rendering is `key value`, one item per line when
/// printing a whole notation. This is a convenience for logging, not a
/// wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub key: String,
    pub value: Value,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.value)
    }
}

/// An owned leaf value with exact width and signedness.
///
/// `Unit` is the value of an item emitted for a composite node that
/// produced no descendants (the "empty leaf" of the aggregation rule).
///
/// # Examples
///
/// ```rust
/// use flatnote::Value;
///
/// assert_eq!(Value::from(-1i8), Value::I8(-1));
/// assert_eq!(Value::from(0.32f32), Value::F32(0.32));
/// assert_eq!(Value::from("tea").to_string(), "tea");
/// assert_eq!(Value::Unit.to_string(), "null");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Unit,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Complex32(Complex32),
    Complex64(Complex64),
    Str(String),
}

impl Value {
    /// The per-kind emptiness predicate used by the skip policy.
    ///
    /// Numerics are empty iff exactly zero, booleans iff `false`,
    /// strings iff zero-length, complex values iff equal to the zero
    /// complex of matching precision. `Unit` is always empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatnote::Value;
    ///
    /// assert!(Value::Bool(false).is_empty());
    /// assert!(Value::I16(0).is_empty());
    /// assert!(!Value::F64(-0.64).is_empty());
    /// assert!(Value::Str(String::new()).is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Unit => true,
            Value::Bool(b) => !b,
            Value::I8(v) => *v == 0,
            Value::I16(v) => *v == 0,
            Value::I32(v) => *v == 0,
            Value::I64(v) => *v == 0,
            Value::Isize(v) => *v == 0,
            Value::U8(v) => *v == 0,
            Value::U16(v) => *v == 0,
            Value::U32(v) => *v == 0,
            Value::U64(v) => *v == 0,
            Value::Usize(v) => *v == 0,
            Value::F32(v) => *v == 0.0,
            Value::F64(v) => *v == 0.0,
            Value::Complex32(v) => *v == Complex32::new(0.0, 0.0),
            Value::Complex64(v) => *v == Complex64::new(0.0, 0.0),
            Value::Str(s) => s.is_empty(),
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a boolean, returns it.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value widened to `i64`, for any signed integer width.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I8(v) => Some(i64::from(*v)),
            Value::I16(v) => Some(i64::from(*v)),
            Value::I32(v) => Some(i64::from(*v)),
            Value::I64(v) => Some(*v),
            Value::Isize(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Returns the value widened to `u64`, for any unsigned integer width.
    #[inline]
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U8(v) => Some(u64::from(*v)),
            Value::U16(v) => Some(u64::from(*v)),
            Value::U32(v) => Some(u64::from(*v)),
            Value::U64(v) => Some(*v),
            Value::Usize(v) => Some(*v as u64),
            _ => None,
        }
    }

    /// Returns the value widened to `f64`, for either float width.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(f64::from(*v)),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// A short token naming the value's kind, used in error messages and
    /// as the default root key for scalar roots.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::Isize(_) => "isize",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::Usize(_) => "usize",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Complex32(_) => "complex32",
            Value::Complex64(_) => "complex64",
            Value::Str(_) => "str",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::Isize(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::Usize(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Complex32(v) => write!(f, "{}", v),
            Value::Complex64(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Unit => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::I8(v) => serializer.serialize_i8(*v),
            Value::I16(v) => serializer.serialize_i16(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::Isize(v) => serializer.serialize_i64(*v as i64),
            Value::U8(v) => serializer.serialize_u8(*v),
            Value::U16(v) => serializer.serialize_u16(*v),
            Value::U32(v) => serializer.serialize_u32(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::Usize(v) => serializer.serialize_u64(*v as u64),
            Value::F32(v) => serializer.serialize_f32(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Complex32(v) => {
                let mut t = serializer.serialize_tuple(2)?;
                t.serialize_element(&v.re)?;
                t.serialize_element(&v.im)?;
                t.end()
            }
            Value::Complex64(v) => {
                let mut t = serializer.serialize_tuple(2)?;
                t.serialize_element(&v.re)?;
                t.serialize_element(&v.im)?;
                t.end()
            }
            Value::Str(s) => serializer.serialize_str(s),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    Complex32 => Complex32,
    Complex64 => Complex64,
    String => Str,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emptiness_per_kind() {
        assert!(Value::Unit.is_empty());
        assert!(Value::Bool(false).is_empty());
        assert!(!Value::Bool(true).is_empty());
        assert!(Value::I8(0).is_empty());
        assert!(!Value::I8(-1).is_empty());
        assert!(Value::U64(0).is_empty());
        assert!(!Value::U64(64).is_empty());
        assert!(Value::F32(0.0).is_empty());
        assert!(!Value::F32(0.32).is_empty());
        assert!(Value::Str(String::new()).is_empty());
        assert!(!Value::Str(" ".to_string()).is_empty());
        assert!(Value::Complex64(Complex64::new(0.0, 0.0)).is_empty());
        assert!(!Value::Complex64(Complex64::new(0.0, 0.1)).is_empty());
    }

    #[test]
    fn test_from_preserves_width() {
        assert_eq!(Value::from(1u8), Value::U8(1));
        assert_eq!(Value::from(1u64), Value::U64(1));
        assert_eq!(Value::from(-16i16), Value::I16(-16));
        assert_eq!(Value::from(0.1f32), Value::F32(0.1));
        assert_ne!(Value::from(1u8), Value::U16(1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Unit.to_string(), "null");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::I32(-32).to_string(), "-32");
        assert_eq!(Value::F64(0.1).to_string(), "0.1");
        assert_eq!(Value::from("Uno").to_string(), "Uno");
    }

    #[test]
    fn test_item_display() {
        let item = Item {
            key: "Planet.mass".to_string(),
            value: Value::F64(317.8),
        };
        assert_eq!(item.to_string(), "Planet.mass 317.8");
    }

    #[test]
    fn test_serialize_exact_widths() {
        let json = serde_json::to_string(&Value::U8(8)).unwrap();
        assert_eq!(json, "8");
        let json = serde_json::to_string(&Value::Str("Dos".into())).unwrap();
        assert_eq!(json, "\"Dos\"");
        let json = serde_json::to_string(&Value::Unit).unwrap();
        assert_eq!(json, "null");
        let json = serde_json::to_string(&Value::Complex32(Complex32::new(0.5, 1.5))).unwrap();
        assert_eq!(json, "[0.5,1.5]");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::I16(-3).as_i64(), Some(-3));
        assert_eq!(Value::U8(3).as_u64(), Some(3));
        assert_eq!(Value::U8(3).as_i64(), None);
        assert_eq!(Value::F32(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
    }
}
