//! Error types for notation flattening.
//!
//! Flattening is deterministic: an error always indicates a structural or
//! type-support problem with the input, never a transient condition, so
//! there is no retry machinery here. The first error encountered aborts
//! the whole traversal and the caller gets no partial notation.
//!
//! ## Error Categories
//!
//! - **Invalid values**: an absent underlying value at a position that
//!   expects one (e.g. a `None` sequence element)
//! - **Unsupported kinds**: no flattening rule exists for the node
//!   (double optionals, disabled capabilities, exotic map keys)
//! - **Modifier faults**: a registered modifier panicked; the panic is
//!   caught at the invocation site and converted into this error
//! - **Depth breaches**: the configured recursion limit was exceeded
//!
//! ## Examples
//!
//! ```rust
//! use flatnote::{notation, Mode, Error};
//!
//! let absent: Option<i32> = None;
//! let result = notation(&absent, Mode::SkipEmpty, ".");
//! assert!(matches!(result, Err(Error::InvalidValue(_))));
//! ```

use std::fmt;
use thiserror::Error;

/// All errors that can occur while flattening a value into a notation.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The dereferenced node has no valid underlying representation.
    #[error("invalid value of {0}")]
    InvalidValue(String),

    /// The node kind has no defined flattening rule.
    #[error("no flattening rule for {0}")]
    UnsupportedKind(String),

    /// A registered modifier panicked during invocation.
    #[error("modifier for {type_name} panicked: {detail}")]
    ModifierFault { type_name: String, detail: String },

    /// Recursion went deeper than the configured limit.
    #[error("flattening exceeded the depth limit of {0}")]
    DepthExceeded(usize),

    /// Generic message, used by the serde bridge.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates an invalid-value error naming the declared type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatnote::Error;
    ///
    /// let err = Error::invalid_value("Option<String>");
    /// assert!(err.to_string().contains("Option<String>"));
    /// ```
    pub fn invalid_value(type_name: impl Into<String>) -> Self {
        Error::InvalidValue(type_name.into())
    }

    /// Creates an unsupported-kind error naming the kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatnote::Error;
    ///
    /// let err = Error::unsupported_kind("optional");
    /// assert!(err.to_string().contains("optional"));
    /// ```
    pub fn unsupported_kind(kind: impl Into<String>) -> Self {
        Error::UnsupportedKind(kind.into())
    }

    /// Creates a modifier-fault error from a caught panic.
    pub fn modifier_fault(type_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::ModifierFault {
            type_name: type_name.into(),
            detail: detail.into(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
