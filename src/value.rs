//! Dynamic value tree for JSON5 documents.
//!
//! [`Value`] is the in-memory form of a parsed document. Every consumer
//! matches on the variant before touching its payload, so there is no way to
//! read the wrong arm.
//!
//! ## Creating Values
//!
//! ```rust
//! use json5_tree::Value;
//!
//! let mut list = Value::array();
//! list.append(Value::from(1)).unwrap();
//! list.append(Value::from("two")).unwrap();
//!
//! let mut obj = Value::object();
//! obj.set("list", list).unwrap();
//! obj.set("flag", Value::from(true)).unwrap();
//!
//! assert_eq!(obj.get("flag").and_then(Value::as_bool), Some(true));
//! ```
//!
//! ## Ownership
//!
//! A tree owns all of its keys, strings and child storage. Dropping a
//! `Value` releases the whole subtree exactly once; there is no sharing
//! between trees. `Value` is `Send + Sync`, so a fully built tree can be
//! read from several threads through shared references, while mutation
//! requires exclusive access.

use crate::error::ErrorCode;
use crate::{Error, Map, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Capacity reserved the first time an array grows.
pub const ARRAY_INITIAL_CAPACITY: usize = 32;

/// A dynamically-typed JSON5 value.
///
/// # Examples
///
/// ```rust
/// use json5_tree::Value;
///
/// let null = Value::Null;
/// let num = Value::Number(42.0);
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
    /// A failure recorded in-tree instead of aborting the whole build.
    Error(ErrorCode),
}

impl Value {
    /// Creates a null value.
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Value::Null
    }

    /// Creates a boolean value.
    #[inline]
    #[must_use]
    pub const fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Creates a number value.
    #[inline]
    #[must_use]
    pub const fn number(n: f64) -> Self {
        Value::Number(n)
    }

    /// Creates a string value owning a copy of `s`.
    #[must_use]
    pub fn string(s: &str) -> Self {
        Value::String(s.to_string())
    }

    /// Creates an empty array. Storage is allocated on first append.
    #[inline]
    #[must_use]
    pub const fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// Creates an empty object. Storage is allocated on first insert.
    #[inline]
    #[must_use]
    pub fn object() -> Self {
        Value::Object(Map::new())
    }

    /// Returns the name of this value's variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Error(_) => "error",
        }
    }

    /// Appends an element to an array.
    ///
    /// Storage grows by doubling, starting at
    /// [`ARRAY_INITIAL_CAPACITY`], so appends are amortized O(1).
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadParameter`] if `self` is not an array and
    /// [`Error::OutOfMemory`] if storage cannot be grown. In both cases
    /// `self` is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json5_tree::Value;
    ///
    /// let mut arr = Value::array();
    /// arr.append(Value::from(1)).unwrap();
    /// assert_eq!(arr.as_array().map(Vec::len), Some(1));
    ///
    /// assert!(Value::Null.append(Value::from(1)).is_err());
    /// ```
    pub fn append(&mut self, elem: Value) -> Result<()> {
        match self {
            Value::Array(elems) => push_doubling(elems, elem),
            _ => Err(Error::bad_parameter(format!(
                "cannot append to {}",
                self.kind()
            ))),
        }
    }

    /// Sets a field on an object, returning the value it replaced.
    ///
    /// A key that is already present keeps its position; only its value
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadParameter`] if `self` is not an object and
    /// [`Error::OutOfMemory`] if storage cannot be grown.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json5_tree::Value;
    ///
    /// let mut obj = Value::object();
    /// assert_eq!(obj.set("a", Value::from(1)).unwrap(), None);
    /// assert_eq!(obj.set("a", Value::from(2)).unwrap(), Some(Value::from(1)));
    /// ```
    pub fn set(&mut self, key: &str, value: Value) -> Result<Option<Value>> {
        match self {
            Value::Object(map) => map.insert(key.to_string(), value),
            _ => Err(Error::bad_parameter(format!(
                "cannot set field `{}` on {}",
                key,
                self.kind()
            ))),
        }
    }

    /// Looks up a field on an object. Returns `None` for non-objects.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Looks up a field on an object for mutation.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Value::Object(map) => map.get_mut(key),
            _ => None,
        }
    }

    /// Resolves a bracket path such as `['a'][0]['b']` against this value.
    ///
    /// See [`crate::path`] for the grammar and error rules.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json5_tree::parse_str;
    ///
    /// let doc = parse_str("{foo: 1, bar: [true, null]}").unwrap();
    /// assert_eq!(doc.at("[bar][0]").unwrap().as_bool(), Some(true));
    /// ```
    pub fn at(&self, path: &str) -> Result<&Value> {
        crate::path::index(self, path)
    }

    /// Mutable counterpart of [`Value::at`].
    pub fn at_mut(&mut self, path: &str) -> Result<&mut Value> {
        crate::path::index_mut(self, path)
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` if the value is an in-tree error.
    #[inline]
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a number, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// If the value is a whole number that fits in `i64`, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json5_tree::Value;
    ///
    /// assert_eq!(Value::Number(42.0).as_i64(), Some(42));
    /// assert_eq!(Value::Number(42.5).as_i64(), None);
    /// assert_eq!(Value::Number(f64::NAN).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => whole_i64(*n),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is an array, returns a mutable reference to it.
    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is an object, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// If the value is an object, returns a mutable reference to it.
    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// If the value is an in-tree error, returns its code.
    #[inline]
    #[must_use]
    pub fn as_error(&self) -> Option<ErrorCode> {
        match self {
            Value::Error(code) => Some(*code),
            _ => None,
        }
    }
}

/// Pushes onto `elems`, doubling capacity (from [`ARRAY_INITIAL_CAPACITY`]) when full.
pub(crate) fn push_doubling(elems: &mut Vec<Value>, elem: Value) -> Result<()> {
    if elems.len() == elems.capacity() {
        let additional = elems.capacity().max(ARRAY_INITIAL_CAPACITY);
        elems.try_reserve_exact(additional)?;
    }
    elems.push(elem);
    Ok(())
}

fn whole_i64(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

impl fmt::Display for Value {
    /// Pretty-prints the value with default [`PrintOptions`](crate::PrintOptions).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::to_string(self))
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null | Value::Error(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match whole_i64(*n) {
                Some(i) if !(i == 0 && n.is_sign_negative()) => serializer.serialize_i64(i),
                _ => serializer.serialize_f64(*n),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid JSON5 value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E> {
                Ok(Value::Number(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E> {
                Ok(Value::Number(value as f64))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E> {
                Ok(Value::Number(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    push_doubling(&mut vec, elem).map_err(<A::Error as de::Error>::custom)?;
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Map::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value).map_err(<A::Error as de::Error>::custom)?;
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl FromStr for Value {
    type Err = Error;

    /// Parses a whole document with default [`ParseOptions`](crate::ParseOptions).
    fn from_str(s: &str) -> Result<Self> {
        crate::parse_str(s)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Number(n) => whole_i64(n)
                .ok_or_else(|| Error::bad_parameter(format!("cannot convert {} to i64", n))),
            other => Err(Error::bad_parameter(format!(
                "expected number, found {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(n),
            other => Err(Error::bad_parameter(format!(
                "expected number, found {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::bad_parameter(format!(
                "expected bool, found {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::bad_parameter(format!(
                "expected string, found {}",
                other.kind()
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_lossless_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(f64::from(value))
                }
            }
        )*
    };
}

from_lossless_number!(i8, i16, i32, u8, u16, u32, f32, f64);

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Object(value)
    }
}

impl From<ErrorCode> for Value {
    fn from(code: ErrorCode) -> Self {
        Value::Error(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn test_constructors() {
        assert_eq!(Value::null(), Value::Null);
        assert_eq!(Value::bool(true), Value::Bool(true));
        assert_eq!(Value::number(1.5), Value::Number(1.5));
        assert_eq!(Value::string("hi"), Value::String("hi".to_string()));
        assert_eq!(Value::array(), Value::Array(vec![]));
        assert_eq!(Value::object(), Value::Object(Map::new()));
    }

    #[test]
    fn test_append_growth_doubles() {
        let mut arr = Value::array();
        arr.append(Value::from(0)).unwrap();
        assert_eq!(
            arr.as_array().map(Vec::capacity),
            Some(ARRAY_INITIAL_CAPACITY)
        );

        for i in 1..=ARRAY_INITIAL_CAPACITY as i32 {
            arr.append(Value::from(i)).unwrap();
        }
        assert_eq!(
            arr.as_array().map(Vec::capacity),
            Some(ARRAY_INITIAL_CAPACITY * 2)
        );

        let elems = arr.as_array().unwrap();
        for (i, elem) in elems.iter().enumerate() {
            assert_eq!(elem.as_i64(), Some(i as i64));
        }
    }

    #[test]
    fn test_append_to_non_array() {
        let mut obj = Value::object();
        let err = obj.append(Value::Null).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadParameter);
        assert!(obj.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut obj = Value::object();
        obj.set("x", Value::from(1)).unwrap();
        obj.set("y", Value::from(2)).unwrap();
        obj.set("x", Value::from("one")).unwrap();

        let map = obj.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.position("x"), Some(0));
        assert_eq!(obj.get("x").and_then(Value::as_str), Some("one"));
    }

    #[test]
    fn test_set_on_non_object() {
        let mut arr = Value::array();
        let err = arr.set("x", Value::Null).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadParameter);
    }

    #[test]
    fn test_tryfrom() {
        assert_eq!(i64::try_from(Value::Number(42.0)).unwrap(), 42);
        assert!(i64::try_from(Value::Number(0.5)).is_err());
        assert!(i64::try_from(Value::from("x")).is_err());
        assert_eq!(f64::try_from(Value::Number(f64::INFINITY)).unwrap(), f64::INFINITY);
        assert!(bool::try_from(Value::Bool(true)).unwrap());
        assert!(bool::try_from(Value::Number(1.0)).is_err());
        assert_eq!(String::try_from(Value::from("hi")).unwrap(), "hi");
    }

    #[test]
    fn test_error_variant() {
        let value = Value::from(ErrorCode::Syntax);
        assert!(value.is_error());
        assert_eq!(value.as_error(), Some(ErrorCode::Syntax));
        assert_eq!(value.kind(), "error");
    }

    #[test]
    fn test_serialize_through_serde_json() {
        let mut obj = Value::object();
        obj.set("n", Value::from(3)).unwrap();
        obj.set("f", Value::from(1.5)).unwrap();
        obj.set("list", Value::from(vec![Value::Null, Value::from(true)]))
            .unwrap();
        let json = serde_json::to_string(&obj).unwrap();
        assert_eq!(json, r#"{"n":3,"f":1.5,"list":[null,true]}"#);
    }

    #[test]
    fn test_deserialize_from_serde_json() {
        let value: Value = serde_json::from_str(r#"{"b": [1, "x"], "a": null}"#).unwrap();
        let map = value.as_object().unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(
            value.get("b"),
            Some(&Value::from(vec![Value::from(1), Value::from("x")]))
        );
    }

    #[test]
    fn test_value_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Value>();
    }
}
