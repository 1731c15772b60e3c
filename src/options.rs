//! Configuration for flattening.
//!
//! Two knobs come from the one-shot API (the skip [`Mode`] and the glue
//! string) and the rest are capability flags with sensible defaults:
//!
//! - `maps`: whether associative maps may appear in a traversal
//! - `complex`: whether complex-number leaves may appear
//! - `max_depth`: an optional recursion bound
//!
//! Historical revisions of this kind of flattener disagreed on whether
//! maps and complex values are supported at all, so both are explicit,
//! documented flags here rather than a hardcoded policy. Both default to
//! enabled.
//!
//! ## Examples
//!
//! ```rust
//! use flatnote::{FlattenOptions, Flattener, Mode};
//!
//! let options = FlattenOptions::new()
//!     .with_mode(Mode::SkipEmpty)
//!     .with_glue("/")
//!     .with_maps(false)
//!     .with_max_depth(32);
//! let flattener = Flattener::with_options(options);
//! # let _ = flattener;
//! ```

/// Whether empty leaves are omitted from the notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// Keep every leaf, empty or not.
    #[default]
    NoSkipEmpty,
    /// Omit leaves whose kind-specific emptiness predicate holds.
    SkipEmpty,
}

/// Configuration for one [`Flattener`](crate::Flattener).
///
/// Immutable for the duration of a traversal.
#[derive(Clone, Debug)]
pub struct FlattenOptions {
    pub mode: Mode,
    pub glue: String,
    pub maps: bool,
    pub complex: bool,
    pub max_depth: Option<usize>,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        FlattenOptions {
            mode: Mode::default(),
            glue: ".".to_string(),
            maps: true,
            complex: true,
            max_depth: None,
        }
    }
}

impl FlattenOptions {
    /// Creates the default options (`NoSkipEmpty`, `"."` glue, maps and
    /// complex enabled, no depth limit).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the skip mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the separator inserted between a parent key and a child
    /// field name.
    #[must_use]
    pub fn with_glue(mut self, glue: impl Into<String>) -> Self {
        self.glue = glue.into();
        self
    }

    /// Enables or disables associative-map support. When disabled, a map
    /// node fails the traversal with an unsupported-kind error.
    #[must_use]
    pub fn with_maps(mut self, maps: bool) -> Self {
        self.maps = maps;
        self
    }

    /// Enables or disables complex-number support. When disabled, a
    /// complex leaf fails the traversal with an unsupported-kind error.
    #[must_use]
    pub fn with_complex(mut self, complex: bool) -> Self {
        self.complex = complex;
        self
    }

    /// Bounds recursion depth. A traversal that would descend past
    /// `depth` levels fails with a depth-exceeded error instead of
    /// overflowing the stack.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}
