//! Flattening through serde.
//!
//! [`from_serialize`] produces the same notation the engine does, but for
//! any `T: serde::Serialize`, with no [`Inspect`](crate::Inspect) impl
//! and no macro invocation. The value's `Serialize` impl drives a
//! flattening [`serde::Serializer`] directly; no intermediate tree is
//! built.
//!
//! The bridge trades away the engine's reflective features:
//!
//! - modifiers never fire (serde hands us data, not concrete values)
//! - a root sequence gets the generic key `seq` instead of a type name
//!   (serde does not carry container type names)
//! - an absent `Option` produces nothing wherever it appears, since a
//!   serializer cannot tell a root from a sequence element
//!
//! Everything else matches: path synthesis, width fidelity, the skip
//! policy, the aggregation rule, the capability flags, and the depth
//! bound.
//!
//! ## Examples
//!
//! ```rust
//! use flatnote::{from_serialize, Mode};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Planet {
//!     mass: f64,
//!     rings: bool,
//! }
//!
//! let saturn = Planet { mass: 95.2, rings: true };
//! let items = from_serialize(&saturn, Mode::NoSkipEmpty, ".").unwrap();
//! assert_eq!(items[0].key, "Planet.mass");
//! assert_eq!(items[1].key, "Planet.rings");
//! ```

use crate::error::{Error, Result};
use crate::options::{FlattenOptions, Mode};
use crate::value::{Item, Value};
use serde::ser::{self, Serialize};

/// Flattens any `Serialize` value with the given mode and glue.
///
/// # Errors
///
/// Fails on the kinds the notation model cannot carry (128-bit integers,
/// non-scalar map keys), on disabled capabilities, and on a breached
/// depth limit.
pub fn from_serialize<T>(value: &T, mode: Mode, glue: impl Into<String>) -> Result<Vec<Item>>
where
    T: Serialize + ?Sized,
{
    from_serialize_with(value, &FlattenOptions::new().with_mode(mode).with_glue(glue))
}

/// Flattens any `Serialize` value with full options.
pub fn from_serialize_with<T>(value: &T, options: &FlattenOptions) -> Result<Vec<Item>>
where
    T: Serialize + ?Sized,
{
    value.serialize(FlatSerializer {
        options,
        key: String::new(),
        depth: 0,
    })
}

struct FlatSerializer<'o> {
    options: &'o FlattenOptions,
    key: String,
    depth: usize,
}

impl<'o> FlatSerializer<'o> {
    fn check_depth(&self) -> Result<()> {
        if let Some(limit) = self.options.max_depth {
            if self.depth > limit {
                return Err(Error::DepthExceeded(limit));
            }
        }
        Ok(())
    }

    fn leaf(self, value: Value) -> Result<Vec<Item>> {
        self.check_depth()?;
        let key = if self.key.is_empty() {
            value.kind().to_string()
        } else {
            self.key
        };
        if self.options.mode == Mode::SkipEmpty && value.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![Item { key, value }])
        }
    }

}

impl<'o> ser::Serializer for FlatSerializer<'o> {
    type Ok = Vec<Item>;
    type Error = Error;

    type SerializeSeq = SeqFrame<'o>;
    type SerializeTuple = SeqFrame<'o>;
    type SerializeTupleStruct = SeqFrame<'o>;
    type SerializeTupleVariant = SeqFrame<'o>;
    type SerializeMap = MapFrame<'o>;
    type SerializeStruct = StructFrame<'o>;
    type SerializeStructVariant = StructFrame<'o>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        self.leaf(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        self.leaf(Value::I8(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        self.leaf(Value::I16(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        self.leaf(Value::I32(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
        self.leaf(Value::I64(v))
    }

    fn serialize_i128(self, _v: i128) -> Result<Self::Ok> {
        Err(Error::unsupported_kind("i128"))
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        self.leaf(Value::U8(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        self.leaf(Value::U16(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        self.leaf(Value::U32(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        self.leaf(Value::U64(v))
    }

    fn serialize_u128(self, _v: u128) -> Result<Self::Ok> {
        Err(Error::unsupported_kind("u128"))
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok> {
        self.leaf(Value::F32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok> {
        self.leaf(Value::F64(v))
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        self.leaf(Value::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        self.leaf(Value::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        self.check_depth()?;
        let key = if self.key.is_empty() {
            "seq".to_string()
        } else {
            self.key
        };
        let skip = self.options.mode == Mode::SkipEmpty;
        let mut items = Vec::new();
        for (index, byte) in v.iter().enumerate() {
            if skip && *byte == 0 {
                continue;
            }
            items.push(Item {
                key: format!("{}[{}]", key, index),
                value: Value::U8(*byte),
            });
        }
        Ok(items)
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(Vec::new())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        self.leaf(Value::Unit)
    }

    fn serialize_unit_struct(mut self, name: &'static str) -> Result<Self::Ok> {
        if self.key.is_empty() {
            self.key = name.to_string();
        }
        self.leaf(Value::Unit)
    }

    fn serialize_unit_variant(
        mut self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        if self.key.is_empty() {
            self.key = name.to_string();
        }
        self.leaf(Value::Str(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(mut self, name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: Serialize + ?Sized,
    {
        if self.key.is_empty() {
            self.key = name.to_string();
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        mut self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok>
    where
        T: Serialize + ?Sized,
    {
        let base = if self.key.is_empty() {
            name.to_string()
        } else {
            self.key
        };
        self.key = format!("{}{}{}", base, self.options.glue, variant);
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.check_depth()?;
        let key = if self.key.is_empty() {
            "seq".to_string()
        } else {
            self.key
        };
        Ok(SeqFrame {
            options: self.options,
            key,
            depth: self.depth,
            index: 0,
            items: Vec::new(),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        mut self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        if self.key.is_empty() {
            self.key = name.to_string();
        }
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        mut self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        let base = if self.key.is_empty() {
            name.to_string()
        } else {
            self.key
        };
        self.key = format!("{}{}{}", base, self.options.glue, variant);
        self.serialize_seq(Some(len))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        self.check_depth()?;
        if !self.options.maps {
            return Err(Error::unsupported_kind("map"));
        }
        Ok(MapFrame {
            options: self.options,
            key: self.key,
            depth: self.depth,
            pending: None,
            entries: 0,
            items: Vec::new(),
        })
    }

    fn serialize_struct(mut self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        self.check_depth()?;
        if self.key.is_empty() {
            self.key = name.to_string();
        }
        Ok(StructFrame {
            options: self.options,
            key: self.key,
            depth: self.depth,
            items: Vec::new(),
        })
    }

    fn serialize_struct_variant(
        mut self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        let base = if self.key.is_empty() {
            name.to_string()
        } else {
            std::mem::take(&mut self.key)
        };
        self.key = format!("{}{}{}", base, self.options.glue, variant);
        self.serialize_struct(name, len)
    }
}

pub struct SeqFrame<'o> {
    options: &'o FlattenOptions,
    key: String,
    depth: usize,
    index: usize,
    items: Vec<Item>,
}

impl SeqFrame<'_> {
    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let child = FlatSerializer {
            options: self.options,
            key: format!("{}[{}]", self.key, self.index),
            depth: self.depth + 1,
        };
        self.index += 1;
        self.items.extend(value.serialize(child)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SeqFrame<'_> {
    type Ok = Vec<Item>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.element(value)
    }

    // an exhausted sequence yields nothing, in either mode
    fn end(self) -> Result<Self::Ok> {
        Ok(self.items)
    }
}

impl ser::SerializeTuple for SeqFrame<'_> {
    type Ok = Vec<Item>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(self.items)
    }
}

impl ser::SerializeTupleStruct for SeqFrame<'_> {
    type Ok = Vec<Item>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(self.items)
    }
}

impl ser::SerializeTupleVariant for SeqFrame<'_> {
    type Ok = Vec<Item>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(self.items)
    }
}

pub struct StructFrame<'o> {
    options: &'o FlattenOptions,
    key: String,
    depth: usize,
    items: Vec<Item>,
}

impl StructFrame<'_> {
    fn field<T>(&mut self, name: &'static str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let child = FlatSerializer {
            options: self.options,
            key: format!("{}{}{}", self.key, self.options.glue, name),
            depth: self.depth + 1,
        };
        self.items.extend(value.serialize(child)?);
        Ok(())
    }

    fn aggregate(self) -> Result<Vec<Item>> {
        if !self.items.is_empty() {
            return Ok(self.items);
        }
        if self.options.mode == Mode::SkipEmpty {
            Ok(Vec::new())
        } else {
            Ok(vec![Item {
                key: self.key,
                value: Value::Unit,
            }])
        }
    }
}

impl ser::SerializeStruct for StructFrame<'_> {
    type Ok = Vec<Item>;
    type Error = Error;

    fn serialize_field<T>(&mut self, name: &'static str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.field(name, value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.aggregate()
    }
}

impl ser::SerializeStructVariant for StructFrame<'_> {
    type Ok = Vec<Item>;
    type Error = Error;

    fn serialize_field<T>(&mut self, name: &'static str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.field(name, value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.aggregate()
    }
}

pub struct MapFrame<'o> {
    options: &'o FlattenOptions,
    key: String,
    depth: usize,
    pending: Option<String>,
    entries: usize,
    items: Vec<Item>,
}

impl ser::SerializeMap for MapFrame<'_> {
    type Ok = Vec<Item>;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.pending = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let map_key = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("map value serialized before its key"))?;
        self.entries += 1;
        let child = FlatSerializer {
            options: self.options,
            key: format!("{}[{}]", self.key, map_key),
            depth: self.depth + 1,
        };
        self.items.extend(value.serialize(child)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        // an empty map yields nothing, a non-empty map aggregates
        if self.entries == 0 {
            return Ok(Vec::new());
        }
        if !self.items.is_empty() {
            return Ok(self.items);
        }
        if self.options.mode == Mode::SkipEmpty {
            Ok(Vec::new())
        } else {
            Ok(vec![Item {
                key: self.key,
                value: Value::Unit,
            }])
        }
    }
}

/// Serializer for map keys: scalars format to their path representation,
/// everything else is rejected.
struct MapKeySerializer;

fn key_unsupported() -> Error {
    Error::unsupported_kind("map key")
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = ser::Impossible<String, Error>;
    type SerializeTuple = ser::Impossible<String, Error>;
    type SerializeTupleStruct = ser::Impossible<String, Error>;
    type SerializeTupleVariant = ser::Impossible<String, Error>;
    type SerializeMap = ser::Impossible<String, Error>;
    type SerializeStruct = ser::Impossible<String, Error>;
    type SerializeStructVariant = ser::Impossible<String, Error>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, v: f32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f64(self, v: f64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(key_unsupported())
    }

    fn serialize_none(self) -> Result<String> {
        Err(key_unsupported())
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        Err(key_unsupported())
    }

    fn serialize_unit(self) -> Result<String> {
        Err(key_unsupported())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(key_unsupported())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        Err(key_unsupported())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_unsupported())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_unsupported())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_unsupported())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_unsupported())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_unsupported())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_unsupported())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_unsupported())
    }
}
