//! Persistent hash map.
//!
//! [`HashMap`] stores its pairs as [`Entry`] values in a [`Set`]. An entry
//! hashes and compares by its key alone, so the set keeps keys unique and the
//! value rides along without affecting placement.
//!
//! # Examples
//!
//! ```rust
//! use trieseq::persistent::HashMap;
//!
//! let map = HashMap::new();
//! let (first, added) = map.insert(1, "one");
//! assert!(added);
//!
//! let (second, added) = first.insert(1, "wat");
//! assert!(!added);
//!
//! assert_eq!(second.get(&1), Some(&"wat"));
//! assert_eq!(first.get(&1), Some(&"one"));
//! ```

use std::fmt;
use std::iter::FromIterator;

use super::hashset::{Set, SetIterator};
use crate::hashable::{HashError, Hashable, dispatch_equal, dispatch_hash};
use crate::sequence::{self, Sequence, write_delimited};

// =============================================================================
// Entry
// =============================================================================

/// A key/value pair stored in a [`HashMap`].
///
/// Its [`Hashable`] impl looks only at `key`. The derived `PartialEq`
/// compares both halves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<K, V> {
    /// The part that decides placement and equality.
    pub key: K,
    /// Carried along; never hashed or compared by the map.
    pub value: V,
}

impl<K, V> Entry<K, V> {
    /// Creates an entry binding `key` to `value`.
    #[inline]
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Splits the entry into a `(key, value)` tuple.
    #[inline]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Entry<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self { key, value }
    }
}

impl<K: Hashable, V> Hashable for Entry<K, V> {
    #[inline]
    fn hash(&self, seed: u32) -> u32 {
        self.key.hash(seed)
    }

    #[inline]
    fn equal(&self, other: &Self) -> bool {
        self.key.equal(&other.key)
    }

    #[inline]
    fn try_hash(&self, seed: u32) -> Result<u32, HashError> {
        self.key.try_hash(seed)
    }
}

/// Renders as `key -> value`.
impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} -> {}", self.key, self.value)
    }
}

// =============================================================================
// HashMap Definition
// =============================================================================

/// A persistent hash map.
///
/// The default value is the empty map; every operation is valid on it.
pub struct HashMap<K, V> {
    set: Set<Entry<K, V>>,
}

impl<K, V> HashMap<K, V> {
    /// Creates a new empty map.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { set: Set::new() }
    }

    /// Returns the number of entries, O(1).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Returns an iterator over the entries, in trie order.
    #[inline]
    pub fn iter(&self) -> SetIterator<'_, Entry<K, V>> {
        self.set.iter()
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|entry| &entry.key)
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|entry| &entry.value)
    }

    /// Returns the underlying set of entries.
    #[inline]
    pub const fn as_set(&self) -> &Set<Entry<K, V>> {
        &self.set
    }
}

impl<K: Clone + Hashable, V: Clone> HashMap<K, V> {
    /// Builds a map from `(key, value)` pairs. A repeated key keeps the last
    /// value given for it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trieseq::persistent::HashMap;
    ///
    /// let map = HashMap::from_entries([("a", 1), ("b", 2), ("a", 3)]);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get(&"a"), Some(&3));
    /// ```
    #[must_use]
    pub fn from_entries<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        Self {
            set: Set::from_values(entries.into_iter().map(Entry::from)),
        }
    }

    fn find(&self, key: &K) -> Option<&Entry<K, V>> {
        self.set.get_by(
            |seed| dispatch_hash(key, seed),
            |entry| dispatch_equal(&entry.key, key),
        )
    }

    /// Returns the value stored under `key`.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|entry| &entry.value)
    }

    /// Returns the stored key equal to `key` together with its value.
    #[inline]
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|entry| (&entry.key, &entry.value))
    }

    /// Returns `true` if `key` is bound.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns a map with `key` bound to `value`, and whether `key` was not
    /// present before. Rebinding an existing key reports `false`.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> (Self, bool) {
        let (set, added) = self.set.insert(Entry::new(key, value));
        (Self { set }, added)
    }

    /// Fallible form of [`insert`](Self::insert) that validates the key's
    /// hashability first.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Unhashable`] if `key` has no hash. The map is
    /// left as it was.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trieseq::persistent::{HashMap, List};
    /// use trieseq::value::Value;
    ///
    /// let map: HashMap<Value, i32> = HashMap::new();
    /// assert!(map.try_insert(Value::from("key"), 1).is_ok());
    /// assert!(map.try_insert(Value::from(List::new()), 2).is_err());
    /// ```
    pub fn try_insert(&self, key: K, value: V) -> Result<(Self, bool), HashError> {
        let (set, added) = self.set.try_insert(Entry::new(key, value))?;
        Ok((Self { set }, added))
    }

    /// Returns a map without `key`, and whether it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trieseq::persistent::HashMap;
    ///
    /// let map = HashMap::from_entries([(1, "one"), (2, "two")]);
    /// let (smaller, removed) = map.remove(&1);
    /// assert!(removed);
    /// assert_eq!(smaller.get(&1), None);
    /// assert_eq!(map.get(&1), Some(&"one"));
    /// ```
    #[must_use]
    pub fn remove(&self, key: &K) -> (Self, bool) {
        let (set, removed) = self.set.remove_by(
            |seed| dispatch_hash(key, seed),
            |entry| dispatch_equal(&entry.key, key),
        );
        (Self { set }, removed)
    }

    /// Splits off an arbitrary entry as a `(key, value)` pair.
    #[must_use]
    pub fn first_rest_entry(&self) -> (Option<(K, V)>, Self, bool) {
        let (first, rest, found) = self.first_rest();
        (first.map(Entry::into_pair), rest, found)
    }
}

impl<K: Clone + Hashable, V: Clone> Sequence for HashMap<K, V> {
    type Item = Entry<K, V>;

    fn first_rest(&self) -> (Option<Entry<K, V>>, Self, bool) {
        let (first, set, found) = self.set.first_rest();
        (first, Self { set }, found)
    }

    #[inline]
    fn size(&self) -> u64 {
        self.set.size()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Clone for HashMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            set: self.set.clone(),
        }
    }
}

impl<K, V> Default for HashMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Hashable, V: Clone> FromIterator<(K, V)> for HashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<K: Clone + Hashable, V: Clone> FromIterator<Entry<K, V>> for HashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = Entry<K, V>>>(iter: I) -> Self {
        Self {
            set: Set::from_values(iter),
        }
    }
}

impl<K: Clone + Hashable, V: Clone> IntoIterator for HashMap<K, V> {
    type Item = Entry<K, V>;
    type IntoIter = sequence::SequenceIntoIter<Self>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        sequence::into_iter(self)
    }
}

impl<'a, K, V> IntoIterator for &'a HashMap<K, V> {
    type Item = &'a Entry<K, V>;
    type IntoIter = SetIterator<'a, Entry<K, V>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Clone + Hashable, V: Clone + PartialEq> PartialEq for HashMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|entry| other.get(&entry.key) == Some(&entry.value))
    }
}

impl<K: Clone + Hashable, V: Clone + Eq> Eq for HashMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_map()
            .entries(self.iter().map(|entry| (&entry.key, &entry.value)))
            .finish()
    }
}

/// Renders as `{ k -> v ... }`, in trie order.
impl<K: fmt::Display, V: fmt::Display> fmt::Display for HashMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_delimited(formatter, "{", "}", self.iter())
    }
}

// =============================================================================
// Tests
// =============================================================================
