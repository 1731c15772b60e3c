//! # flatnote
//!
//! A structure-to-flat-map transcoder: flatten arbitrarily nested values
//! into an ordered sequence of `(path, value)` pairs (a *notation*)
//! where each path is a dotted, bracket-indexed route from the root to
//! one leaf.
//!
//! ```text
//! Planet.mass          1.0
//! Planet.moons[0].name Luna
//! Planet.tags[vip]     true
//! ```
//!
//! ## Quick Start
//!
//! Describe a struct's fields once with [`inspect!`], then flatten:
//!
//! ```rust
//! use flatnote::{inspect, notation, Mode};
//!
//! struct Moon {
//!     name: String,
//! }
//! inspect!(Moon { name });
//!
//! struct Planet {
//!     mass: f64,
//!     rings: bool,
//!     moons: Vec<Moon>,
//! }
//! inspect!(Planet { mass, rings, moons });
//!
//! let earth = Planet {
//!     mass: 1.0,
//!     rings: false,
//!     moons: vec![Moon { name: "Luna".to_string() }],
//! };
//!
//! let items = notation(&earth, Mode::NoSkipEmpty, ".").unwrap();
//! let keys: Vec<_> = items.iter().map(|i| i.key.as_str()).collect();
//! assert_eq!(keys, ["Planet.mass", "Planet.rings", "Planet.moons[0].name"]);
//! ```
//!
//! ## The two front doors
//!
//! - [`notation`] / [`Flattener`] walk values through the [`Inspect`]
//!   reflection trait. This path supports *modifiers*: per-type
//!   overrides that replace a whole subtree with a single rendered
//!   leaf (see [`modifier`]).
//! - [`from_serialize`] flattens any `serde::Serialize` type with no
//!   `Inspect` impl at all, trading away modifier support (see [`ser`]).
//!
//! ## Rules of the notation
//!
//! - **Paths**: struct fields append `glue` + field name (or its alias),
//!   sequence elements append `[index]`, map entries append
//!   `[formattedKey]`.
//! - **Aggregation**: a composite whose children produced items
//!   contributes no item of its own; one whose children produced nothing
//!   collapses to a single `Unit` leaf. Sequences are the exception and
//!   simply vanish when empty.
//! - **Skip policy**: [`Mode::SkipEmpty`] omits leaves whose
//!   kind-specific emptiness predicate holds (zero, `false`, `""`, the
//!   zero complex); [`Mode::NoSkipEmpty`] keeps everything.
//! - **Width fidelity**: a `u8` leaf stays [`Value::U8`], never a
//!   widened 64-bit value.
//! - **Order**: items appear in depth-first declaration order; repeated
//!   traversals of the same value yield identical notations.
//!
//! ## Modifiers
//!
//! ```rust
//! use chrono::{DateTime, Utc};
//! use flatnote::{inspect, modifier, Flattener, Mode};
//!
//! struct Event {
//!     label: String,
//!     at: DateTime<Utc>,
//! }
//! inspect!(Event { label, at });
//!
//! let flattener = Flattener::new(Mode::NoSkipEmpty, ".")
//!     .register_modifier(modifier::timestamp());
//!
//! let event = Event {
//!     label: "launch".to_string(),
//!     at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
//! };
//! let items = flattener.notation(&event).unwrap();
//! assert_eq!(items[1].key, "Event.at");
//! assert_eq!(items[1].value.as_str(), Some("2023-11-14T22:13:20Z"));
//! ```
//!
//! ## Export
//!
//! [`Item`] and [`Value`] implement `serde::Serialize` with exact scalar
//! widths, so a finished notation can be handed to any serde backend.

pub mod error;
pub mod flatten;
pub mod inspect;
pub mod macros;
pub mod map;
pub mod modifier;
pub mod options;
pub mod ser;
pub mod value;

pub use error::{Error, Result};
pub use flatten::Flattener;
pub use inspect::{FieldNode, Inspect, MapNode, Node, NodeRef, SeqNode, StructNode};
pub use map::{MapKey, ToMapKey};
pub use modifier::Modified;
pub use options::{FlattenOptions, Mode};
pub use ser::{from_serialize, from_serialize_with};
pub use value::{Item, Value};

/// One-shot flattening through the [`Inspect`] trait, with no
/// modifiers.
///
/// Equivalent to `Flattener::new(mode, glue).notation(value)`. Build a
/// [`Flattener`] instead when you need modifiers or the extra
/// [`FlattenOptions`] knobs.
///
/// # Errors
///
/// See [`Flattener::notation`].
pub fn notation<T: Inspect>(value: &T, mode: Mode, glue: impl Into<String>) -> Result<Vec<Item>> {
    Flattener::new(mode, glue).notation(value)
}
