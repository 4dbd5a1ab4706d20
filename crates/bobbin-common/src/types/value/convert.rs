use indexmap::IndexMap;
use smol_str::SmolStr;

use super::{Array, Data, Object};

impl From<bool> for Data {
    fn from(v: bool) -> Self {
        Data::Boolean(v)
    }
}

impl From<i64> for Data {
    fn from(v: i64) -> Self {
        Data::Integer(v)
    }
}

impl From<i32> for Data {
    fn from(v: i32) -> Self {
        Data::Integer(v as i64)
    }
}

impl From<u64> for Data {
    fn from(v: u64) -> Self {
        i64::try_from(v)
            .map(Data::Integer)
            .unwrap_or(Data::Unsigned(v))
    }
}

impl From<f64> for Data {
    fn from(v: f64) -> Self {
        Data::Float(v)
    }
}

impl From<&str> for Data {
    fn from(v: &str) -> Self {
        Data::String(SmolStr::new(v))
    }
}

impl From<String> for Data {
    fn from(v: String) -> Self {
        Data::String(SmolStr::from(v))
    }
}

impl From<SmolStr> for Data {
    fn from(v: SmolStr) -> Self {
        Data::String(v)
    }
}

impl From<Array> for Data {
    fn from(v: Array) -> Self {
        Data::Array(v)
    }
}

impl From<Object> for Data {
    fn from(v: Object) -> Self {
        Data::Object(v)
    }
}

impl<T: Into<Data>> From<Vec<T>> for Data {
    fn from(v: Vec<T>) -> Self {
        Data::Array(v.into_iter().collect())
    }
}

impl<T: Into<Data>> From<Option<T>> for Data {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Data::Null)
    }
}

impl From<serde_json::Value> for Data {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Data::Null,
            serde_json::Value::Bool(b) => Data::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Data::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Data::Unsigned(u)
                } else {
                    Data::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Data::String(SmolStr::from(s)),
            serde_json::Value::Array(arr) => Data::Array(Array(
                arr.into_iter().map(Data::from).collect(),
            )),
            serde_json::Value::Object(map) => Data::Object(Object(
                map.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), Data::from(v)))
                    .collect::<IndexMap<_, _>>(),
            )),
        }
    }
}

impl From<Data> for serde_json::Value {
    fn from(data: Data) -> Self {
        match data {
            Data::Null => serde_json::Value::Null,
            Data::Boolean(b) => serde_json::Value::Bool(b),
            Data::Integer(i) => serde_json::Value::Number(i.into()),
            Data::Unsigned(u) => serde_json::Value::Number(u.into()),
            Data::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Data::String(s) => serde_json::Value::String(s.to_string()),
            Data::Array(arr) => {
                serde_json::Value::Array(arr.0.into_iter().map(serde_json::Value::from).collect())
            }
            Data::Object(obj) => serde_json::Value::Object(
                obj.0
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<Data> for Object {
    type Error = Data;

    /// Hands the value back unchanged when it is not an object.
    fn try_from(data: Data) -> Result<Self, Self::Error> {
        match data {
            Data::Object(obj) => Ok(obj),
            other => Err(other),
        }
    }
}

impl PartialEq<str> for Data {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Data {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for Data {
    fn eq(&self, other: &i64) -> bool {
        self.as_integer() == Some(*other)
    }
}
