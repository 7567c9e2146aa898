//! Ordered map type for JSON5 objects.
//!
//! [`Map`] wraps [`IndexMap`] so that object fields keep their first
//! insertion order. Setting a key that already exists replaces the value in
//! place: the field keeps its original position and the field count does
//! not change.
//!
//! ## Examples
//!
//! ```rust
//! use json5_tree::{Map, Value};
//!
//! let mut map = Map::new();
//! map.insert("name".to_string(), Value::from("Alice")).unwrap();
//! map.insert("age".to_string(), Value::from(30)).unwrap();
//! map.insert("name".to_string(), Value::from("Bob")).unwrap();
//!
//! let keys: Vec<_> = map.keys().cloned().collect();
//! assert_eq!(keys, vec!["name", "age"]);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Bob"));
//! ```

use crate::{Result, Value};
use indexmap::IndexMap;

/// Capacity reserved the first time an object grows.
pub const OBJECT_INITIAL_CAPACITY: usize = 16;

/// An insertion-ordered map of string keys to values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map(IndexMap<String, Value>);

impl Map {
    /// Creates an empty `Map`. Nothing is allocated until the first insert.
    #[must_use]
    pub fn new() -> Self {
        Map(IndexMap::new())
    }

    /// Inserts a key-value pair, growing storage by doubling when full.
    ///
    /// If the key is already present its value is replaced in place and the
    /// old value is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`](crate::Error::OutOfMemory) if storage
    /// for a new field cannot be reserved.
    pub fn insert(&mut self, key: String, value: Value) -> Result<Option<Value>> {
        if let Some(slot) = self.0.get_mut(&key) {
            return Ok(Some(std::mem::replace(slot, value)));
        }
        if self.0.len() == self.0.capacity() {
            let additional = self.0.capacity().max(OBJECT_INITIAL_CAPACITY);
            self.0.try_reserve(additional)?;
        }
        self.0.insert(key, value);
        Ok(None)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Returns the position of a key in insertion order.
    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.0.get_index_of(key)
    }

    /// Returns `true` if the map contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of fields in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields the map can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl IntoIterator for Map {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Map(IndexMap::from_iter(iter))
    }
}
