//! The reflection seam between caller types and the flattening engine.
//!
//! Rust has no universal runtime introspection, so the engine consumes a
//! small trait instead: a type implements [`Inspect`] by describing its
//! own shape as a [`Node`], a closed, enumerated view of one level of
//! the value. The engine never sees the concrete type; it dispatches on
//! the node kind, and reaches back to the concrete value only through
//! `dyn Any` when a modifier is registered for it.
//!
//! Implementations for the standard building blocks (scalars, `String`,
//! `Option`, `Box`, `Vec`, arrays, the three common map types, and
//! `chrono::DateTime<Utc>`) ship with the crate. For your own field
//! structs, the [`inspect!`](crate::inspect!) macro writes the impl:
//!
//! ```rust
//! use flatnote::{inspect, notation, Mode};
//!
//! struct Planet {
//!     mass: f64,
//!     rings: bool,
//!     moons: u8,
//! }
//!
//! inspect!(Planet { mass, rings, moons });
//!
//! let earth = Planet { mass: 1.0, rings: false, moons: 1 };
//! let items = notation(&earth, Mode::SkipEmpty, ".").unwrap();
//! assert_eq!(items.len(), 2); // rings=false is empty and skipped
//! ```
//!
//! ## Children
//!
//! A composite node refers to its children as [`NodeRef`]s: usually a
//! borrow of another `Inspect` value, but opaque types may synthesize
//! scalar children they cannot hand out by reference (see the
//! `DateTime<Utc>` impl, which exposes `secs`/`nanos` fields).

use crate::map::{MapKey, ToMapKey};
use crate::value::Value;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use num_complex::{Complex32, Complex64};
use std::any::{self, Any};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A type that can describe its own shape to the flattening engine.
///
/// The `Any` supertrait lets the engine recover the concrete value for
/// modifier dispatch; it also means implementors must be `'static`.
pub trait Inspect: Any {
    /// Returns a one-level reflected view of this value.
    fn reflect(&self) -> Node<'_>;
}

/// A reflected view of one node of a value graph.
///
/// This is the closed tagged-variant dispatch target of the engine:
/// every kind the flattener supports is a variant here, and anything
/// unrepresentable simply cannot enter a traversal.
pub enum Node<'a> {
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
    Str(Cow<'a, str>),
    Struct(StructNode<'a>),
    Seq(SeqNode<'a>),
    Map(MapNode<'a>),
    /// One level of optional/pointer indirection. `inner: None` is the
    /// absent sentinel; `name` is the declared type, for error messages.
    Optional {
        name: &'static str,
        inner: Option<&'a dyn Inspect>,
    },
    /// A dynamically-typed slot (trait object). `None` means the slot
    /// holds no concrete value and flattens to nothing.
    Dynamic(Option<&'a dyn Inspect>),
}

impl<'a> Node<'a> {
    /// A short token naming the node's kind, used in error messages and
    /// as the default root key for scalar roots.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Node::Bool(_) => "bool",
            Node::I8(_) => "i8",
            Node::I16(_) => "i16",
            Node::I32(_) => "i32",
            Node::I64(_) => "i64",
            Node::Isize(_) => "isize",
            Node::U8(_) => "u8",
            Node::U16(_) => "u16",
            Node::U32(_) => "u32",
            Node::U64(_) => "u64",
            Node::Usize(_) => "usize",
            Node::F32(_) => "f32",
            Node::F64(_) => "f64",
            Node::Complex32(_) => "complex32",
            Node::Complex64(_) => "complex64",
            Node::Str(_) => "str",
            Node::Struct(_) => "struct",
            Node::Seq(_) => "seq",
            Node::Map(_) => "map",
            Node::Optional { .. } => "optional",
            Node::Dynamic(_) => "dynamic",
        }
    }
}

/// A reflected struct: its declared type name and fields in declaration
/// order.
pub struct StructNode<'a> {
    pub name: &'static str,
    pub fields: Vec<FieldNode<'a>>,
}

/// One struct field. `alias` is the tag-provided override name, if any;
/// a degenerate alias (blank, or the bare `-` token) falls back to the
/// declared `name` during key synthesis.
pub struct FieldNode<'a> {
    pub name: &'static str,
    pub alias: Option<&'static str>,
    pub value: NodeRef<'a>,
}

impl<'a> FieldNode<'a> {
    pub fn new(name: &'static str, value: &'a dyn Inspect) -> Self {
        FieldNode {
            name,
            alias: None,
            value: NodeRef::Borrowed(value),
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// The field name used in the path: the alias when present and
    /// non-degenerate, else the declared name.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.alias {
            Some(alias) if !alias.trim().is_empty() && alias != "-" => alias,
            _ => self.name,
        }
    }
}

/// A reflected sequence: the declared type name (used for whole-sequence
/// modifier lookup and the default root key) and its elements in order.
pub struct SeqNode<'a> {
    pub name: &'static str,
    pub elems: Vec<NodeRef<'a>>,
}

impl<'a> SeqNode<'a> {
    pub fn new<I>(name: &'static str, elems: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn Inspect>,
    {
        SeqNode {
            name,
            elems: elems.into_iter().map(NodeRef::Borrowed).collect(),
        }
    }
}

/// A reflected map: entries in the order the map's own iterator yields
/// them.
pub struct MapNode<'a> {
    pub entries: Vec<(MapKey, NodeRef<'a>)>,
}

/// A reference to a child node: either a borrow of another `Inspect`
/// value, or an owned scalar synthesized during reflection.
pub enum NodeRef<'a> {
    Borrowed(&'a dyn Inspect),
    Owned(Value),
}

/// Strips module paths from a type name, including inside generic
/// arguments: `alloc::vec::Vec<core::option::Option<i32>>` becomes
/// `Vec<Option<i32>>`.
pub(crate) fn short_name(full: &str) -> String {
    fn last_segment(s: &str) -> &str {
        s.rsplit("::").next().unwrap_or(s)
    }
    let mut out = String::with_capacity(full.len());
    let mut start = 0;
    for (i, c) in full.char_indices() {
        if matches!(c, '<' | '>' | ',' | '(' | ')' | '[' | ']' | ';' | ' ' | '&') {
            out.push_str(last_segment(&full[start..i]));
            out.push(c);
            start = i + c.len_utf8();
        }
    }
    out.push_str(last_segment(&full[start..]));
    out
}

macro_rules! inspect_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn reflect(&self) -> Node<'_> {
                    Node::$variant(*self)
                }
            }
        )*
    };
}

inspect_scalar! {
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
}

impl Inspect for String {
    fn reflect(&self) -> Node<'_> {
        Node::Str(Cow::Borrowed(self))
    }
}

impl Inspect for char {
    fn reflect(&self) -> Node<'_> {
        Node::Str(Cow::Owned(self.to_string()))
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn reflect(&self) -> Node<'_> {
        Node::Optional {
            name: any::type_name::<Self>(),
            inner: self.as_ref().map(|v| v as &dyn Inspect),
        }
    }
}

// Boxes are transparent, like auto-dereferenced pointers: the box
// flattens exactly as its pointee would. A modifier for the pointee type
// will not fire through a box; register it for `Box<T>` instead.
impl<T: Inspect> Inspect for Box<T> {
    fn reflect(&self) -> Node<'_> {
        (**self).reflect()
    }
}

impl Inspect for Box<dyn Inspect> {
    fn reflect(&self) -> Node<'_> {
        Node::Dynamic(Some(&**self))
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn reflect(&self) -> Node<'_> {
        Node::Seq(SeqNode::new(
            any::type_name::<Self>(),
            self.iter().map(|e| e as &dyn Inspect),
        ))
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn reflect(&self) -> Node<'_> {
        Node::Seq(SeqNode::new(
            any::type_name::<Self>(),
            self.iter().map(|e| e as &dyn Inspect),
        ))
    }
}

impl<K, V, S> Inspect for HashMap<K, V, S>
where
    K: ToMapKey + 'static,
    V: Inspect,
    S: BuildHasher + 'static,
{
    fn reflect(&self) -> Node<'_> {
        Node::Map(MapNode {
            entries: self
                .iter()
                .map(|(k, v)| (k.to_map_key(), NodeRef::Borrowed(v as &dyn Inspect)))
                .collect(),
        })
    }
}

impl<K, V> Inspect for BTreeMap<K, V>
where
    K: ToMapKey + 'static,
    V: Inspect,
{
    fn reflect(&self) -> Node<'_> {
        Node::Map(MapNode {
            entries: self
                .iter()
                .map(|(k, v)| (k.to_map_key(), NodeRef::Borrowed(v as &dyn Inspect)))
                .collect(),
        })
    }
}

impl<K, V, S> Inspect for IndexMap<K, V, S>
where
    K: ToMapKey + 'static,
    V: Inspect,
    S: BuildHasher + 'static,
{
    fn reflect(&self) -> Node<'_> {
        Node::Map(MapNode {
            entries: self
                .iter()
                .map(|(k, v)| (k.to_map_key(), NodeRef::Borrowed(v as &dyn Inspect)))
                .collect(),
        })
    }
}

// Timestamps are opaque; expose the two components a consumer could
// recover the instant from. The usual way to flatten one is the
// `modifier::timestamp()` override, which renders RFC 3339 instead.
impl Inspect for DateTime<Utc> {
    fn reflect(&self) -> Node<'_> {
        Node::Struct(StructNode {
            name: "DateTime<Utc>",
            fields: vec![
                FieldNode {
                    name: "secs",
                    alias: None,
                    value: NodeRef::Owned(Value::I64(self.timestamp())),
                },
                FieldNode {
                    name: "nanos",
                    alias: None,
                    value: NodeRef::Owned(Value::U32(self.timestamp_subsec_nanos())),
                },
            ],
        })
    }
}
