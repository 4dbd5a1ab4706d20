use base64::Engine;
use base64::prelude::BASE64_STANDARD_NO_PAD;
use indexmap::IndexMap;
use serde::de::{IntoDeserializer, value::MapAccessDeserializer};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::{SmolStr, ToSmolStr};
use std::fmt;

use super::{Array, Data, Object};

impl Serialize for Data {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Data::Null => serializer.serialize_unit(),
            Data::Boolean(b) => serializer.serialize_bool(*b),
            Data::Integer(i) => serializer.serialize_i64(*i),
            Data::Unsigned(u) => serializer.serialize_u64(*u),
            Data::Float(f) => serializer.serialize_f64(*f),
            Data::String(s) => serializer.serialize_str(s),
            Data::Array(arr) => arr.serialize(serializer),
            Data::Object(obj) => obj.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Data {
    /// Only works for self-describing formats, which JSON is.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DataVisitor)
    }
}

struct DataVisitor;

impl<'de> serde::de::Visitor<'de> for DataVisitor {
    type Value = Data;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any valid JSON value")
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Data::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Data::Null)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Data::Boolean(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Data::Integer(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Data::from(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Data::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Data::String(v.to_smolstr()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Data::String(SmolStr::from(v)))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(bytes_object(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut array = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(elem) = seq.next_element()? {
            array.push(elem);
        }
        Ok(Data::Array(Array(array)))
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut object = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<SmolStr, Data>()? {
            // Later duplicates win but keep the first position.
            object.insert(key, value);
        }
        Ok(Data::Object(Object(object)))
    }
}

/// `{"$bytes": "<base64>"}`, the JSON form of a byte string in atproto data.
fn bytes_object(v: &[u8]) -> Data {
    let mut map = IndexMap::with_capacity(1);
    map.insert(
        SmolStr::new_static("$bytes"),
        Data::String(BASE64_STANDARD_NO_PAD.encode(v).into()),
    );
    Data::Object(Object(map))
}

impl Serialize for Array {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in &self.0 {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Array {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Array(Vec::<Data>::deserialize(deserializer)?))
    }
}

impl Serialize for Object {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match deserializer.deserialize_any(DataVisitor)? {
            Data::Object(obj) => Ok(obj),
            other => Err(D::Error::invalid_type(
                serde::de::Unexpected::Other(other.kind()),
                &"a JSON object",
            )),
        }
    }
}

/// Error produced when projecting a typed value to or from [`Data`]
#[derive(Debug, Clone, PartialEq, thiserror::Error, miette::Diagnostic)]
pub enum DataError {
    /// Custom error message from a serde impl
    #[error("{0}")]
    Message(String),
    /// Object keys have to be strings (or something that prints as one)
    #[error("object key must be a string, found {0}")]
    KeyMustBeString(&'static str),
    /// Integer outside both the `i64` and `u64` ranges
    #[error("integer does not fit in 64 bits")]
    IntegerOutOfRange,
}

impl serde::de::Error for DataError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DataError::Message(msg.to_string())
    }
}

impl serde::ser::Error for DataError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DataError::Message(msg.to_string())
    }
}

// Deserializer implementation for Data - lets typed shapes be read out of a Data value
impl<'de> Deserializer<'de> for Data {
    type Error = DataError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: serde::de::Visitor<'de>,
    {
        match self {
            Data::Null => visitor.visit_unit(),
            Data::Boolean(b) => visitor.visit_bool(b),
            Data::Integer(i) => visitor.visit_i64(i),
            Data::Unsigned(u) => visitor.visit_u64(u),
            Data::Float(f) => visitor.visit_f64(f),
            Data::String(s) => visitor.visit_str(&s),
            Data::Array(arr) => visitor.visit_seq(OwnedArrayDeserializer::new(arr.0)),
            Data::Object(obj) => visitor.visit_map(OwnedObjectDeserializer::new(obj.0)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: serde::de::Visitor<'de>,
    {
        match self {
            Data::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: serde::de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: serde::de::Visitor<'de>,
    {
        match self {
            Data::String(s) => {
                visitor.visit_enum(IntoDeserializer::<'de, DataError>::into_deserializer(s.to_string()))
            }
            Data::Object(obj) if obj.len() == 1 => {
                visitor.visit_enum(MapAccessDeserializer::new(OwnedObjectDeserializer::new(obj.0)))
            }
            other => Err(serde::de::Error::invalid_type(
                serde::de::Unexpected::Other(other.kind()),
                &"a string or single-key object",
            )),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: serde::de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier
    }
}

impl<'de> IntoDeserializer<'de, DataError> for Data {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}

// SeqAccess implementation for Data::Array
struct OwnedArrayDeserializer {
    iter: std::vec::IntoIter<Data>,
}

impl OwnedArrayDeserializer {
    fn new(items: Vec<Data>) -> Self {
        Self {
            iter: items.into_iter(),
        }
    }
}

impl<'de> serde::de::SeqAccess<'de> for OwnedArrayDeserializer {
    type Error = DataError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: serde::de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(value).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

// MapAccess implementation for Data::Object
struct OwnedObjectDeserializer {
    iter: indexmap::map::IntoIter<SmolStr, Data>,
    value: Option<Data>,
}

impl OwnedObjectDeserializer {
    fn new(map: IndexMap<SmolStr, Data>) -> Self {
        Self {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> serde::de::MapAccess<'de> for OwnedObjectDeserializer {
    type Error = DataError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: serde::de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(IntoDeserializer::<'de, DataError>::into_deserializer(
                    key.to_string(),
                ))
                .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: serde::de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(value),
            None => Err(DataError::Message("value is missing".to_string())),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Serializer that captures any `Serialize` value as [`Data`].
///
/// Struct fields and map entries keep their serialization order.
pub struct DataSerializer;

impl Serializer for DataSerializer {
    type Ok = Data;
    type Error = DataError;

    type SerializeSeq = DataSeqSerializer;
    type SerializeTuple = DataSeqSerializer;
    type SerializeTupleStruct = DataSeqSerializer;
    type SerializeTupleVariant = DataSeqSerializer;
    type SerializeMap = DataMapSerializer;
    type SerializeStruct = DataMapSerializer;
    type SerializeStructVariant = DataMapSerializer;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        Ok(Data::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        Ok(Data::Integer(v as i64))
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        Ok(Data::Integer(v as i64))
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        Ok(Data::Integer(v as i64))
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        Ok(Data::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Self::Ok, Self::Error> {
        if let Ok(i) = i64::try_from(v) {
            Ok(Data::Integer(i))
        } else if let Ok(u) = u64::try_from(v) {
            Ok(Data::Unsigned(u))
        } else {
            Err(DataError::IntegerOutOfRange)
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        Ok(Data::Integer(v as i64))
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        Ok(Data::Integer(v as i64))
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        Ok(Data::Integer(v as i64))
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        Ok(Data::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok, Self::Error> {
        u64::try_from(v)
            .map(Data::from)
            .map_err(|_| DataError::IntegerOutOfRange)
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        Ok(Data::Float(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok, Self::Error> {
        Ok(Data::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        Ok(Data::String(v.to_smolstr()))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        Ok(Data::String(v.to_smolstr()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        Ok(bytes_object(v))
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Ok(Data::Null)
    }

    fn serialize_some<T: ?Sized>(self, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(Data::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Ok(Data::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Ok(Data::String(SmolStr::new_static(variant)))
    }

    fn serialize_newtype_struct<T: ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: Serialize,
    {
        let mut map = IndexMap::with_capacity(1);
        map.insert(SmolStr::new_static(variant), value.serialize(DataSerializer)?);
        Ok(Data::Object(Object(map)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(DataSeqSerializer {
            items: Vec::with_capacity(len.unwrap_or(0)),
            variant: None,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(DataSeqSerializer {
            items: Vec::with_capacity(len),
            variant: Some(variant),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(DataMapSerializer {
            map: IndexMap::with_capacity(len.unwrap_or(0)),
            next_key: None,
            variant: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(DataMapSerializer {
            map: IndexMap::with_capacity(len),
            next_key: None,
            variant: Some(variant),
        })
    }
}

/// Wrap `inner` as `{variant: inner}` for externally tagged enum variants.
fn wrap_variant(variant: Option<&'static str>, inner: Data) -> Data {
    match variant {
        Some(variant) => {
            let mut map = IndexMap::with_capacity(1);
            map.insert(SmolStr::new_static(variant), inner);
            Data::Object(Object(map))
        }
        None => inner,
    }
}

/// Sequence serializer for [`DataSerializer`]
pub struct DataSeqSerializer {
    items: Vec<Data>,
    variant: Option<&'static str>,
}

impl serde::ser::SerializeSeq for DataSeqSerializer {
    type Ok = Data;
    type Error = DataError;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        self.items.push(value.serialize(DataSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(wrap_variant(self.variant, Data::Array(Array(self.items))))
    }
}

impl serde::ser::SerializeTuple for DataSeqSerializer {
    type Ok = Data;
    type Error = DataError;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        serde::ser::SerializeSeq::end(self)
    }
}

impl serde::ser::SerializeTupleStruct for DataSeqSerializer {
    type Ok = Data;
    type Error = DataError;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        serde::ser::SerializeSeq::end(self)
    }
}

impl serde::ser::SerializeTupleVariant for DataSeqSerializer {
    type Ok = Data;
    type Error = DataError;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        serde::ser::SerializeSeq::end(self)
    }
}

/// Map and struct serializer for [`DataSerializer`]
pub struct DataMapSerializer {
    map: IndexMap<SmolStr, Data>,
    next_key: Option<SmolStr>,
    variant: Option<&'static str>,
}

impl serde::ser::SerializeMap for DataMapSerializer {
    type Ok = Data;
    type Error = DataError;

    fn serialize_key<T: ?Sized>(&mut self, key: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        let key = match key.serialize(DataSerializer)? {
            Data::String(s) => s,
            Data::Integer(i) => i.to_smolstr(),
            Data::Unsigned(u) => u.to_smolstr(),
            Data::Boolean(b) => b.to_smolstr(),
            other => return Err(DataError::KeyMustBeString(other.kind())),
        };
        self.next_key = Some(key);
        Ok(())
    }

    fn serialize_value<T: ?Sized>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| DataError::Message("map value without a key".to_string()))?;
        self.map.insert(key, value.serialize(DataSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(wrap_variant(self.variant, Data::Object(Object(self.map))))
    }
}

impl serde::ser::SerializeStruct for DataMapSerializer {
    type Ok = Data;
    type Error = DataError;

    fn serialize_field<T: ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        self.map
            .insert(SmolStr::new_static(key), value.serialize(DataSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        SerializeMap::end(self)
    }
}

impl serde::ser::SerializeStructVariant for DataMapSerializer {
    type Ok = Data;
    type Error = DataError;

    fn serialize_field<T: ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error>
    where
        T: Serialize,
    {
        serde::ser::SerializeStruct::serialize_field(self, key, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        SerializeMap::end(self)
    }
}
