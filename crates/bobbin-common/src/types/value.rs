use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use smol_str::SmolStr;
use std::fmt;

use crate::error::{DecodeError, EncodeError};
use crate::types::union::TYPE_FIELD;

/// Conversions between [`Data`] and Rust/serde_json values
pub mod convert;
/// Serde implementations for [`Data`], plus a serializer and deserializer over it
pub mod serde_impl;

#[cfg(test)]
mod tests;

pub use serde_impl::{DataError, DataSerializer};

/// A JSON value whose shape is not known at compile time.
///
/// Holds the payload of open-union variants the client does not recognize,
/// as well as fields that a lexicon leaves intentionally untyped. Integers and
/// floats are kept apart, and object keys keep their original order, so that
/// decoding and re-encoding reproduces the source document.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean(bool),
    /// Integral number
    Integer(i64),
    /// Integral number above `i64::MAX`
    Unsigned(u64),
    /// Floating point number
    Float(f64),
    /// String
    String(SmolStr),
    /// Ordered sequence
    Array(Array),
    /// Insertion-ordered mapping with unique keys
    Object(Object),
}

/// Array of [`Data`] values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array(pub Vec<Data>);

/// Insertion-ordered object of [`Data`] values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object(pub IndexMap<SmolStr, Data>);

impl Data {
    /// Parse a JSON document into a [`Data`] value.
    ///
    /// Nesting depth is bounded only by available memory.
    pub fn from_json(bytes: &[u8]) -> Result<Data, DecodeError> {
        let mut de = serde_json::Deserializer::from_slice(bytes);
        de.disable_recursion_limit();
        let data = serde::Deserialize::deserialize(&mut de)?;
        de.end()?;
        Ok(data)
    }

    /// Parse a JSON string into a [`Data`] value.
    pub fn from_json_str(s: &str) -> Result<Data, DecodeError> {
        Self::from_json(s.as_bytes())
    }

    /// Encode as compact JSON bytes.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, EncodeError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Encode as a compact JSON string.
    pub fn to_json_string(&self) -> Result<String, EncodeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Project this value onto a typed shape.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        Ok(T::deserialize(self.clone())?)
    }

    /// Capture a typed value as [`Data`].
    pub fn from_typed<T: Serialize + ?Sized>(value: &T) -> Result<Data, EncodeError> {
        Ok(value.serialize(DataSerializer)?)
    }

    /// Get as a string slice, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        if let Data::String(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    /// Get as an integer, if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        if let Data::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Get as a float. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Data::Float(f) => Some(*f),
            Data::Integer(i) => Some(*i as f64),
            Data::Unsigned(u) => Some(*u as f64),
            _ => None,
        }
    }

    /// Get as a boolean, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        if let Data::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Get as an object, if this is an object
    pub fn as_object(&self) -> Option<&Object> {
        if let Data::Object(obj) = self {
            Some(obj)
        } else {
            None
        }
    }

    /// Get as an array, if this is an array
    pub fn as_array(&self) -> Option<&Array> {
        if let Data::Array(arr) = self {
            Some(arr)
        } else {
            None
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Data::Null)
    }

    /// Look up a key, if this is an object
    pub fn get(&self, key: &str) -> Option<&Data> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// The `$type` discriminator of an object, if present and a string
    pub fn type_discriminator(&self) -> Option<&str> {
        self.as_object().and_then(Object::type_discriminator)
    }

    /// Short name of this value's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Data::Null => "null",
            Data::Boolean(_) => "boolean",
            Data::Integer(_) | Data::Unsigned(_) => "integer",
            Data::Float(_) => "float",
            Data::String(_) => "string",
            Data::Array(_) => "array",
            Data::Object(_) => "object",
        }
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl Array {
    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no elements
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<&Data> {
        self.0.get(index)
    }

    /// Iterate over the elements
    pub fn iter(&self) -> std::slice::Iter<'_, Data> {
        self.0.iter()
    }
}

impl Object {
    /// Create an empty object
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for `key`
    pub fn get(&self, key: &str) -> Option<&Data> {
        self.0.get(key)
    }

    /// Insert at the end, or replace in place if the key already exists.
    pub fn insert(&mut self, key: impl Into<SmolStr>, value: impl Into<Data>) -> Option<Data> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Data> {
        self.0.shift_remove(key)
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> indexmap::map::Iter<'_, SmolStr, Data> {
        self.0.iter()
    }

    /// Iterate over keys in insertion order
    pub fn keys(&self) -> indexmap::map::Keys<'_, SmolStr, Data> {
        self.0.keys()
    }

    /// The `$type` discriminator, if present and a string
    pub fn type_discriminator(&self) -> Option<&str> {
        self.get(TYPE_FIELD).and_then(Data::as_str)
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a SmolStr, &'a Data);
    type IntoIter = indexmap::map::Iter<'a, SmolStr, Data>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Object {
    type Item = (SmolStr, Data);
    type IntoIter = indexmap::map::IntoIter<SmolStr, Data>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<SmolStr>, V: Into<Data>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<V: Into<Data>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Array(iter.into_iter().map(Into::into).collect())
    }
}
