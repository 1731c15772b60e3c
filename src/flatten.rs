//! The flattening engine.
//!
//! [`Flattener`] owns the configuration and the modifier registry, and
//! walks a reflected value graph depth-first. Each recursive call is a
//! pure function of its inputs: the registry and options are read-only
//! for the whole traversal, and results are built by value-returning
//! concatenation, so the engine is trivially reentrant. Traversal is
//! sequential and synchronous; there is no I/O and no background work.
//!
//! ## The aggregation rule
//!
//! A composite node whose recursion produced any items contributes no
//! item of its own: only the flattened descendants appear. A composite
//! node whose recursion produced nothing falls back to a single
//! `Value::Unit` leaf (unless the skip policy omits it). Sequences are
//! the exception: an empty sequence, or one whose elements all produced
//! nothing, yields no item at all in either mode.
//!
//! ## Examples
//!
//! ```rust
//! use flatnote::{inspect, Flattener, Mode};
//!
//! struct Planet { mass: f64, rings: bool, moons: u8 }
//! inspect!(Planet { mass, rings, moons });
//!
//! let earth = Planet { mass: 1.0, rings: false, moons: 0 };
//!
//! let keep = Flattener::new(Mode::NoSkipEmpty, ".");
//! assert_eq!(keep.notation(&earth).unwrap().len(), 3);
//!
//! let skip = Flattener::new(Mode::SkipEmpty, ".");
//! let items = skip.notation(&earth).unwrap();
//! assert_eq!(items.len(), 1);
//! assert_eq!(items[0].key, "Planet.mass");
//! ```

use crate::error::{Error, Result};
use crate::inspect::{short_name, Inspect, MapNode, Node, NodeRef, SeqNode, StructNode};
use crate::modifier::Modified;
use crate::options::{FlattenOptions, Mode};
use crate::value::{Item, Value};
use std::any::{self, Any, TypeId};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

type ModifierFn = Box<dyn Fn(&dyn Any) -> Result<Modified> + Send + Sync>;

struct Registered {
    type_name: &'static str,
    func: ModifierFn,
}

/// Flattens values into ordered `(path, value)` notations.
///
/// Construct one with a [`Mode`] and glue string (or full
/// [`FlattenOptions`]), register any modifiers, then call
/// [`notation`](Flattener::notation) as many times as needed. The
/// registry must be fully populated before the first traversal;
/// `register_modifier` consumes and returns the flattener precisely so
/// that registration and traversal cannot interleave.
pub struct Flattener {
    options: FlattenOptions,
    modifiers: HashMap<TypeId, Registered>,
}

impl Flattener {
    /// Creates a flattener with the given mode and glue and default
    /// capability flags.
    #[must_use]
    pub fn new(mode: Mode, glue: impl Into<String>) -> Self {
        Self::with_options(FlattenOptions::new().with_mode(mode).with_glue(glue))
    }

    /// Creates a flattener from full options.
    #[must_use]
    pub fn with_options(options: FlattenOptions) -> Self {
        Flattener {
            options,
            modifiers: HashMap::new(),
        }
    }

    /// Registers a modifier for the concrete type `T`.
    ///
    /// The modifier is consulted whenever a struct or sequence node of
    /// exactly type `T` is reached; scalars and maps never consult
    /// modifiers. The last registration for a type wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatnote::{inspect, modifier::Modified, Flattener, Mode, Value};
    ///
    /// struct Secret { token: String }
    /// inspect!(Secret { token });
    ///
    /// let flattener = Flattener::new(Mode::NoSkipEmpty, ".")
    ///     .register_modifier(|s: &Secret| {
    ///         Ok(Modified::new("<redacted>", s.token.is_empty()))
    ///     });
    ///
    /// let secret = Secret { token: "hunter2".to_string() };
    /// let items = flattener.notation(&secret).unwrap();
    /// assert_eq!(items.len(), 1);
    /// assert_eq!(items[0].value, Value::from("<redacted>"));
    /// ```
    #[must_use]
    pub fn register_modifier<T, F>(mut self, modifier: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Result<Modified> + Send + Sync + 'static,
    {
        let func: ModifierFn = Box::new(move |value: &dyn Any| match value.downcast_ref::<T>() {
            Some(concrete) => modifier(concrete),
            None => Err(Error::modifier_fault(
                short_name(any::type_name::<T>()),
                "registered type does not match the traversed value",
            )),
        });
        self.modifiers.insert(
            TypeId::of::<T>(),
            Registered {
                type_name: any::type_name::<T>(),
                func,
            },
        );
        self
    }

    /// Flattens `value` into its notation.
    ///
    /// # Errors
    ///
    /// Fails fast on the first structural or type-support problem; no
    /// partial notation is returned.
    pub fn notation<T: Inspect>(&self, value: &T) -> Result<Vec<Item>> {
        self.flatten(String::new(), value.reflect(), Some(value as &dyn Any), 0)
    }

    fn skip(&self) -> bool {
        self.options.mode == Mode::SkipEmpty
    }

    fn flatten(
        &self,
        key: String,
        node: Node<'_>,
        origin: Option<&dyn Any>,
        depth: usize,
    ) -> Result<Vec<Item>> {
        if let Some(limit) = self.options.max_depth {
            if depth > limit {
                return Err(Error::DepthExceeded(limit));
            }
        }

        // one level of optional/pointer indirection
        let (node, origin) = match node {
            Node::Optional { name, inner } => match inner {
                None => return Err(Error::invalid_value(short_name(name))),
                Some(value) => {
                    let inner_node = value.reflect();
                    if let Node::Optional { .. } = inner_node {
                        return Err(Error::unsupported_kind("optional"));
                    }
                    let any: &dyn Any = value;
                    (inner_node, Some(any))
                }
            },
            other => (other, origin),
        };

        let key = if key.is_empty() {
            default_key(&node)
        } else {
            key
        };

        match node {
            Node::Struct(node) => self.flatten_struct(key, node, origin, depth),
            Node::Seq(node) => self.flatten_seq(key, node, origin, depth),
            Node::Map(node) => self.flatten_map(key, node, depth),
            Node::Dynamic(inner) => self.flatten_dynamic(key, inner, depth),
            Node::Bool(v) => Ok(self.leaf(key, Value::Bool(v))),
            Node::I8(v) => Ok(self.leaf(key, Value::I8(v))),
            Node::I16(v) => Ok(self.leaf(key, Value::I16(v))),
            Node::I32(v) => Ok(self.leaf(key, Value::I32(v))),
            Node::I64(v) => Ok(self.leaf(key, Value::I64(v))),
            Node::Isize(v) => Ok(self.leaf(key, Value::Isize(v))),
            Node::U8(v) => Ok(self.leaf(key, Value::U8(v))),
            Node::U16(v) => Ok(self.leaf(key, Value::U16(v))),
            Node::U32(v) => Ok(self.leaf(key, Value::U32(v))),
            Node::U64(v) => Ok(self.leaf(key, Value::U64(v))),
            Node::Usize(v) => Ok(self.leaf(key, Value::Usize(v))),
            Node::F32(v) => Ok(self.leaf(key, Value::F32(v))),
            Node::F64(v) => Ok(self.leaf(key, Value::F64(v))),
            Node::Complex32(v) => {
                if !self.options.complex {
                    return Err(Error::unsupported_kind("complex32"));
                }
                Ok(self.leaf(key, Value::Complex32(v)))
            }
            Node::Complex64(v) => {
                if !self.options.complex {
                    return Err(Error::unsupported_kind("complex64"));
                }
                Ok(self.leaf(key, Value::Complex64(v)))
            }
            Node::Str(s) => Ok(self.leaf(key, Value::Str(s.into_owned()))),
            // a second level of indirection has no flattening rule
            Node::Optional { .. } => Err(Error::unsupported_kind("optional")),
        }
    }

    fn flatten_struct(
        &self,
        key: String,
        node: StructNode<'_>,
        origin: Option<&dyn Any>,
        depth: usize,
    ) -> Result<Vec<Item>> {
        if let Some(modified) = self.try_modify(origin)? {
            if !modified.empty {
                return Ok(vec![Item {
                    key,
                    value: modified.value,
                }]);
            }
            // modifier verdict: empty leaf, no descent into fields
            if self.skip() {
                return Ok(Vec::new());
            }
            return Ok(vec![Item {
                key,
                value: modified.value,
            }]);
        }

        let mut items = Vec::new();
        for field in node.fields {
            let child_key = format!("{}{}{}", key, self.options.glue, field.title());
            match field.value {
                NodeRef::Owned(value) => items.extend(self.leaf(child_key, value)),
                NodeRef::Borrowed(child) => {
                    let child_node = child.reflect();
                    // absent optional fields are skipped silently
                    if let Node::Optional { inner: None, .. } = child_node {
                        continue;
                    }
                    let any: &dyn Any = child;
                    items.extend(self.flatten(child_key, child_node, Some(any), depth + 1)?);
                }
            }
        }

        if !items.is_empty() {
            return Ok(items);
        }
        if self.skip() {
            Ok(Vec::new())
        } else {
            Ok(vec![Item {
                key,
                value: Value::Unit,
            }])
        }
    }

    fn flatten_seq(
        &self,
        key: String,
        node: SeqNode<'_>,
        origin: Option<&dyn Any>,
        depth: usize,
    ) -> Result<Vec<Item>> {
        if let Some(modified) = self.try_modify(origin)? {
            if !modified.empty {
                return Ok(vec![Item {
                    key,
                    value: modified.value,
                }]);
            }
            // an empty verdict on a whole sequence falls through to the
            // per-element walk
        }

        let mut items = Vec::new();
        for (index, elem) in node.elems.into_iter().enumerate() {
            let child_key = format!("{}[{}]", key, index);
            match elem {
                NodeRef::Owned(value) => items.extend(self.leaf(child_key, value)),
                NodeRef::Borrowed(child) => {
                    let any: &dyn Any = child;
                    items.extend(self.flatten(child_key, child.reflect(), Some(any), depth + 1)?);
                }
            }
        }
        // zero elements, or every element produced nothing: no item at
        // all, in either mode
        Ok(items)
    }

    fn flatten_map(&self, key: String, node: MapNode<'_>, depth: usize) -> Result<Vec<Item>> {
        if !self.options.maps {
            return Err(Error::unsupported_kind("map"));
        }
        if node.entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        for (map_key, entry) in node.entries {
            let child_key = format!("{}[{}]", key, map_key);
            match entry {
                NodeRef::Owned(value) => items.extend(self.leaf(child_key, value)),
                NodeRef::Borrowed(child) => {
                    let any: &dyn Any = child;
                    items.extend(self.flatten(child_key, child.reflect(), Some(any), depth + 1)?);
                }
            }
        }

        if !items.is_empty() {
            return Ok(items);
        }
        if self.skip() {
            Ok(Vec::new())
        } else {
            Ok(vec![Item {
                key,
                value: Value::Unit,
            }])
        }
    }

    fn flatten_dynamic(
        &self,
        key: String,
        inner: Option<&dyn Inspect>,
        depth: usize,
    ) -> Result<Vec<Item>> {
        let items = match inner {
            None => Vec::new(),
            Some(value) => {
                let any: &dyn Any = value;
                self.flatten(key.clone(), value.reflect(), Some(any), depth + 1)?
            }
        };
        if !items.is_empty() {
            return Ok(items);
        }
        if self.skip() {
            Ok(Vec::new())
        } else {
            Ok(vec![Item {
                key,
                value: Value::Unit,
            }])
        }
    }

    fn leaf(&self, key: String, value: Value) -> Vec<Item> {
        if self.skip() && value.is_empty() {
            Vec::new()
        } else {
            vec![Item { key, value }]
        }
    }

    /// Consults the registry for the origin's exact type. Membership is
    /// checked before invocation, so a modifier that legitimately
    /// returns an empty verdict is never confused with "no modifier".
    fn try_modify(&self, origin: Option<&dyn Any>) -> Result<Option<Modified>> {
        let Some(origin) = origin else {
            return Ok(None);
        };
        let Some(registered) = self.modifiers.get(&origin.type_id()) else {
            return Ok(None);
        };
        match panic::catch_unwind(AssertUnwindSafe(|| (registered.func)(origin))) {
            Ok(result) => result.map(Some),
            Err(payload) => Err(Error::modifier_fault(
                short_name(registered.type_name),
                panic_detail(&*payload),
            )),
        }
    }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

/// Default root key: the value's type name for structs and sequences,
/// the kind token for scalars, empty for maps and dynamic slots.
fn default_key(node: &Node<'_>) -> String {
    match node {
        Node::Struct(s) => short_name(s.name),
        Node::Seq(s) => short_name(s.name),
        Node::Map(_) | Node::Dynamic(_) | Node::Optional { .. } => String::new(),
        scalar => scalar.kind().to_string(),
    }
}
