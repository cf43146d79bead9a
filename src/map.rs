//! Ordered map type for BXSON objects.
//!
//! [`BxsonMap`] wraps [`IndexMap`] so object members come back out in the order
//! they were written. The renderer walks the map in iteration order, so a
//! document survives parse → decode → encode → render with its key order
//! unchanged.
//!
//! Re-inserting an existing key replaces the value but keeps the key's
//! original position. This is how duplicate keys in a document collapse: the
//! last value wins, the first position stays.
//!
//! ## Examples
//!
//! ```rust
//! use serde_bxson::{BxsonMap, Value};
//!
//! let mut map = BxsonMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::Value;
use indexmap::IndexMap;

/// An insertion-ordered map of string keys to BXSON values.
///
/// # Examples
///
/// ```rust
/// use serde_bxson::{BxsonMap, Value};
///
/// let mut map = BxsonMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
/// map.insert("first".to_string(), Value::from(3));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// assert_eq!(map.get("first").and_then(|v| v.as_i64()), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BxsonMap(IndexMap<String, Value>);

impl BxsonMap {
    #[must_use]
    pub fn new() -> Self {
        BxsonMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        BxsonMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key was already present its value is replaced in place and the
    /// old value is returned.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, shifting later entries up so the remaining order holds.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
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

impl IntoIterator for BxsonMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a BxsonMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for BxsonMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        BxsonMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reinsert_keeps_position() {
        let mut map = BxsonMap::new();
        map.insert("a".to_string(), Value::from(1));
        map.insert("b".to_string(), Value::from(2));
        let old = map.insert("a".to_string(), Value::from(3));

        assert_eq!(old, Some(Value::from(1)));
        let entries: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), v.as_i64())).collect();
        assert_eq!(entries, vec![("a", Some(3)), ("b", Some(2))]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut map: BxsonMap = ["x", "y", "z"]
            .iter()
            .map(|k| (k.to_string(), Value::Null))
            .collect();
        map.remove("y");
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["x", "z"]);
        assert!(!map.contains_key("y"));
    }
}
