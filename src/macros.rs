//! The [`inspect!`](crate::inspect!) macro.
//!
//! Implementing [`Inspect`](crate::Inspect) for a field struct is
//! mechanical (name the type, list the fields), so the macro writes the
//! impl from exactly that:
//!
//! ```rust
//! use flatnote::inspect;
//!
//! struct Planet {
//!     mass: f64,
//!     rings: bool,
//! }
//!
//! inspect!(Planet { mass, rings });
//! ```
//!
//! A field may carry an alias, which replaces the declared name in the
//! synthesized path. An alias of `"-"` (or a blank string) is degenerate
//! and falls back to the declared name:
//!
//! ```rust
//! use flatnote::{inspect, notation, Mode};
//!
//! struct Face {
//!     title: String,
//!     value: u8,
//! }
//!
//! inspect!(Face { title as "name", value as "-" });
//!
//! let face = Face { title: "ace".to_string(), value: 1 };
//! let items = notation(&face, Mode::NoSkipEmpty, ".").unwrap();
//! assert_eq!(items[0].key, "Face.name");
//! assert_eq!(items[1].key, "Face.value");
//! ```
//!
//! Fields are reflected in the order listed, which need not be the
//! declaration order. The macro handles plain (non-generic) named-field
//! structs; anything fancier implements the trait by hand.

/// Implements [`Inspect`](crate::Inspect) for a named-field struct.
///
/// See the [module documentation](crate::macros) for the accepted forms.
#[macro_export]
macro_rules! inspect {
    ($ty:ident { $($field:ident $(as $alias:literal)?),* $(,)? }) => {
        impl $crate::Inspect for $ty {
            fn reflect(&self) -> $crate::Node<'_> {
                $crate::Node::Struct($crate::StructNode {
                    name: ::std::stringify!($ty),
                    fields: ::std::vec![
                        $(
                            {
                                let field = $crate::FieldNode::new(
                                    ::std::stringify!($field),
                                    &self.$field,
                                );
                                $(let field = field.with_alias($alias);)?
                                field
                            }
                        ),*
                    ],
                })
            }
        }
    };
}
