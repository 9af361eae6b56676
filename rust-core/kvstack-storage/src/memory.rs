// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory base store for KVStack.
//
// A plain `HashMap` owned by the store value. This is the terminal node of
// every decorator chain and the ground truth for what "stored" means. There
// is no lock: the store is moved through each call, and `Clone` gives an
// independent snapshot when an earlier state has to be kept.

use std::collections::hash_map::{HashMap, Iter};
use std::hash::Hash;

use crate::backend::{Fetched, Storage};
use crate::error::FetchError;

/// An in-memory store backed by a `HashMap`.
///
/// # Example
///
/// ```rust
/// use kvstack_storage::backend::Storage;
/// use kvstack_storage::memory::MemoryStore;
///
/// let store = MemoryStore::new().put("hello", "world");
/// let (store, value) = store.get(&"hello");
/// assert_eq!(value, Some("world"));
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStore<K, V>
where
    K: Eq + Hash,
{
    entries: HashMap<K, V>,
}

impl<K, V> MemoryStore<K, V>
where
    K: Eq + Hash,
{
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create an empty store with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check for a reference without consuming the store.
    pub fn contains(&self, reference: &K) -> bool {
        self.entries.contains_key(reference)
    }

    /// Iterate over entries in arbitrary order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.entries.iter()
    }
}

impl<K, V> Default for MemoryStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryStore<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K, V> Storage for MemoryStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    type Ref = K;
    type Value = V;
    type ErrorRef = K;

    fn fetch(self, reference: &K) -> (Self, Fetched<V, K>) {
        let result = match self.entries.get(reference) {
            Some(value) => Ok(value.clone()),
            None => Err(FetchError::NoRef(reference.clone())),
        };
        (self, result)
    }

    fn get(self, reference: &K) -> (Self, Option<V>) {
        let value = self.entries.get(reference).cloned();
        (self, value)
    }

    fn put(mut self, reference: K, value: V) -> Self {
        self.entries.insert(reference, value);
        self
    }

    fn delete(mut self, reference: &K) -> Self {
        self.entries.remove(reference);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_crud() {
        let store: MemoryStore<String, String> = MemoryStore::new();

        // Initially empty.
        assert!(store.is_empty());
        let (store, value) = store.get(&"key1".to_string());
        assert_eq!(value, None);

        // Put and get.
        let store = store.put("key1".to_string(), "value1".to_string());
        let (store, value) = store.get(&"key1".to_string());
        assert_eq!(value, Some("value1".to_string()));
        assert_eq!(store.len(), 1);

        // Overwrite.
        let store = store.put("key1".to_string(), "updated".to_string());
        let (store, value) = store.get(&"key1".to_string());
        assert_eq!(value, Some("updated".to_string()));
        assert_eq!(store.len(), 1);

        // Delete existing key.
        let store = store.delete(&"key1".to_string());
        assert!(!store.contains(&"key1".to_string()));
        assert!(store.is_empty());

        // Delete non-existent key.
        let store = store.delete(&"nonexistent".to_string());
        assert!(store.is_empty());
    }

    #[test]
    fn test_fetch_tags_missing_reference() {
        let s0: MemoryStore<&str, &str> = MemoryStore::new();
        let s1 = s0.clone().put("item", "item-value");

        let (_, hit) = s1.fetch(&"item");
        assert_eq!(hit, Ok("item-value"));

        let (_, miss) = s0.fetch(&"item");
        assert_eq!(miss, Err(FetchError::NoRef("item")));
    }

    #[test]
    fn test_absent_marker_distinct_from_stored_none() {
        let store: MemoryStore<&str, Option<u32>> = MemoryStore::new().put("empty", None);

        let (store, stored) = store.get(&"empty");
        assert_eq!(stored, Some(None));

        let (_, missing) = store.get(&"missing");
        assert_eq!(missing, None);
    }

    #[test]
    fn test_clone_is_independent_snapshot() {
        let before = MemoryStore::new().put(1u32, "one");
        let after = before.clone().put(2, "two").delete(&1);

        assert!(before.contains(&1));
        assert!(!before.contains(&2));
        assert!(!after.contains(&1));
        assert!(after.contains(&2));
    }

    #[test]
    fn test_from_iterator_and_iter() {
        let store: MemoryStore<u32, u32> = (0..4).map(|i| (i, i * 10)).collect();
        assert_eq!(store.len(), 4);

        let mut total: u32 = store.iter().map(|(_, v)| *v).sum();
        assert_eq!(total, 60);

        let store = store.delete_all(&[0, 1]);
        total = store.iter().map(|(_, v)| *v).sum();
        assert_eq!(total, 50);
    }

    #[test]
    fn test_with_capacity_starts_empty() {
        let store: MemoryStore<u8, u8> = MemoryStore::with_capacity(64);
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }
}
