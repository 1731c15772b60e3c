//! Map keys and their path formatting.
//!
//! Associative-map entries get path segments of the form
//! `parent[formattedKey]`. The set of key kinds a map may use is a
//! deliberate, versioned capability list, expressed here as the closed
//! [`MapKey`] enum: string, signed and unsigned integers of any width,
//! `f32`, `f64`, and `bool`. A map whose key type is outside this list
//! simply cannot implement [`ToMapKey`], so the unsupported case is ruled
//! out at compile time rather than at traversal time.
//!
//! ## Formatting
//!
//! - string keys render verbatim
//! - integer keys render in decimal, per their signedness
//! - float keys render as the shortest decimal that round-trips at the
//!   key's own bit width (Rust's `Display` for floats)
//! - boolean keys render as the literal tokens `true`/`false`
//!
//! ## Ordering
//!
//! Map entry order in a notation is whatever the map's own iterator
//! yields: unspecified for `HashMap`, insertion order for `IndexMap`,
//! key order for `BTreeMap`. Callers that need deterministic notations
//! should reach for `IndexMap` or `BTreeMap`.
//!
//! ## Examples
//!
//! ```rust
//! use flatnote::MapKey;
//!
//! assert_eq!(MapKey::from("One").to_string(), "One");
//! assert_eq!(MapKey::Int(-1).to_string(), "-1");
//! assert_eq!(MapKey::F32(0.1).to_string(), "0.1");
//! assert_eq!(MapKey::Bool(true).to_string(), "true");
//! ```

use std::fmt;

/// A map key captured during reflection.
///
/// Integer keys collapse to `i64`/`u64` storage since every width
/// formats identically in decimal; float keys keep their bit width
/// because `f32` and `f64` render differently (`0.1f32` is `"0.1"`,
/// while the same value widened to `f64` is not).
#[derive(Debug, Clone, PartialEq)]
pub enum MapKey {
    Str(String),
    Int(i64),
    Uint(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Str(s) => write!(f, "{}", s),
            MapKey::Int(v) => write!(f, "{}", v),
            MapKey::Uint(v) => write!(f, "{}", v),
            MapKey::F32(v) => write!(f, "{}", v),
            MapKey::F64(v) => write!(f, "{}", v),
            MapKey::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for MapKey {
    fn from(value: &str) -> Self {
        MapKey::Str(value.to_string())
    }
}

impl From<String> for MapKey {
    fn from(value: String) -> Self {
        MapKey::Str(value)
    }
}

/// Conversion from a borrowed map key into its captured [`MapKey`] form.
///
/// The set of implementations below is the supported-key-kind capability
/// list. It is closed on purpose: adding a kind is a versioned API
/// change, not an accident of dispatch.
pub trait ToMapKey {
    fn to_map_key(&self) -> MapKey;
}

impl ToMapKey for String {
    fn to_map_key(&self) -> MapKey {
        MapKey::Str(self.clone())
    }
}

impl ToMapKey for &'static str {
    fn to_map_key(&self) -> MapKey {
        MapKey::Str((*self).to_string())
    }
}

impl ToMapKey for bool {
    fn to_map_key(&self) -> MapKey {
        MapKey::Bool(*self)
    }
}

impl ToMapKey for f32 {
    fn to_map_key(&self) -> MapKey {
        MapKey::F32(*self)
    }
}

impl ToMapKey for f64 {
    fn to_map_key(&self) -> MapKey {
        MapKey::F64(*self)
    }
}

macro_rules! signed_map_key {
    ($($ty:ty),*) => {
        $(
            impl ToMapKey for $ty {
                fn to_map_key(&self) -> MapKey {
                    MapKey::Int(*self as i64)
                }
            }
        )*
    };
}

macro_rules! unsigned_map_key {
    ($($ty:ty),*) => {
        $(
            impl ToMapKey for $ty {
                fn to_map_key(&self) -> MapKey {
                    MapKey::Uint(*self as u64)
                }
            }
        )*
    };
}

signed_map_key!(i8, i16, i32, i64, isize);
unsigned_map_key!(u8, u16, u32, u64, usize);
