//! The modifier contract and the bundled modifiers.
//!
//! A modifier is a per-type override: when the engine reaches a struct
//! or sequence node whose concrete type has a registered modifier, the
//! modifier supplies the terminal [`Value`] and an emptiness verdict,
//! and the engine does not descend into the subtree.
//!
//! A modifier returns `Result<Modified>`, so "success with an error also
//! set" (a contract violation some dynamic designs have to police at
//! runtime) is simply unrepresentable. A modifier's own error
//! propagates out of the traversal untouched; a panic inside a modifier
//! is caught at the single invocation site and converted into
//! [`Error::ModifierFault`](crate::Error::ModifierFault).
//!
//! Two modifiers ship with the crate as worked examples:
//!
//! - [`timestamp`] renders `chrono::DateTime<Utc>` as an RFC 3339
//!   string (nanosecond precision, trailing zeros trimmed) and treats
//!   the epoch/default instant as empty
//! - [`display`] renders any `Display` type through its own formatting
//!   and treats an empty rendering as empty
//!
//! ## Examples
//!
//! ```rust
//! use flatnote::{inspect, modifier, Flattener, Mode};
//! use std::fmt;
//!
//! struct Drink { title: String }
//! inspect!(Drink { title });
//!
//! impl fmt::Display for Drink {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "{} is a good drink.", self.title)
//!     }
//! }
//!
//! let flattener = Flattener::new(Mode::SkipEmpty, ".")
//!     .register_modifier(modifier::display::<Drink>());
//!
//! let tea = Drink { title: "Tea".to_string() };
//! let items = flattener.notation(&tea).unwrap();
//! assert_eq!(items[0].value.as_str(), Some("Tea is a good drink."));
//! ```

use crate::error::Result;
use crate::value::Value;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// The outcome of a modifier: the terminal value for the subtree and
/// whether it counts as empty for the skip policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Modified {
    pub value: Value,
    pub empty: bool,
}

impl Modified {
    pub fn new(value: impl Into<Value>, empty: bool) -> Self {
        Modified {
            value: value.into(),
            empty,
        }
    }
}

/// A modifier rendering `DateTime<Utc>` as an RFC 3339 string.
///
/// The default (epoch) instant reports empty, so `SkipEmpty` notations
/// omit unset timestamps.
///
/// # Examples
///
/// ```rust
/// use chrono::{DateTime, Utc};
/// use flatnote::{modifier, Flattener, Mode};
///
/// let flattener = Flattener::new(Mode::NoSkipEmpty, ".")
///     .register_modifier(modifier::timestamp());
///
/// let t = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
/// let items = flattener.notation(&t).unwrap();
/// assert_eq!(items[0].value.as_str(), Some("2023-11-14T22:13:20Z"));
/// ```
pub fn timestamp() -> impl Fn(&DateTime<Utc>) -> Result<Modified> + Send + Sync + 'static {
    |t: &DateTime<Utc>| {
        Ok(Modified {
            empty: *t == DateTime::<Utc>::default(),
            value: Value::Str(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        })
    }
}

/// A modifier rendering any `Display` type through its own formatting.
///
/// An empty rendering reports empty.
pub fn display<T: fmt::Display>() -> impl Fn(&T) -> Result<Modified> + Send + Sync + 'static {
    |v: &T| {
        let rendered = v.to_string();
        Ok(Modified {
            empty: rendered.is_empty(),
            value: Value::Str(rendered),
        })
    }
}
