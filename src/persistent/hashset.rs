//! Persistent hash set.
//!
//! [`Set`] is a thin handle over the re-hashing trie. Every update returns a
//! new set that shares all untouched nodes with the set it was derived from.
//!
//! # Examples
//!
//! ```rust
//! use trieseq::persistent::Set;
//!
//! let set = Set::from_values([0, 1, 2, 3, 4]);
//! let (without_zero, removed) = set.remove(&0);
//! assert!(removed);
//!
//! let (refilled, added) = without_zero.insert(5);
//! assert!(added);
//! assert!(refilled.contains(&5));
//! assert!(!refilled.contains(&0));
//!
//! // The original handle is untouched.
//! assert!(set.contains(&0));
//! assert_eq!(set.len(), 5);
//! ```

use std::fmt;
use std::iter::FromIterator;

use super::trie::{HashTrie, TrieIterator};
use crate::hashable::{HashError, Hashable};
use crate::sequence::{self, Sequence, write_delimited};

/// A persistent set of [`Hashable`] values.
///
/// # Time Complexity
///
/// | Operation                 | Complexity      |
/// |---------------------------|-----------------|
/// | `contains`/`get`          | O(log32 N)      |
/// | `insert`/`remove`         | O(log32 N)      |
/// | `len`                     | O(1)            |
/// | `first_rest`              | O(log32 N)      |
/// | `union`, `difference`, .. | O(M log32 N)    |
pub struct Set<T> {
    trie: HashTrie<T>,
}

impl<T> Set<T> {
    /// Creates a new empty set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            trie: HashTrie::new(),
        }
    }

    /// Returns the number of elements, O(1).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.trie.size()).unwrap_or(usize::MAX)
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Returns an iterator over references to the elements, in trie order.
    #[inline]
    pub fn iter(&self) -> SetIterator<'_, T> {
        SetIterator {
            inner: self.trie.iter(),
        }
    }
}

impl<T: Clone + Hashable> Set<T> {
    /// Creates a set holding exactly `value`.
    #[must_use]
    pub fn singleton(value: T) -> Self {
        Self::new().insert(value).0
    }

    /// Builds a set from `values`. Later duplicates replace earlier ones.
    ///
    /// The trie is built in place since no other handle can observe it yet.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trieseq::persistent::Set;
    ///
    /// let set = Set::from_values(["a", "b", "a"]);
    /// assert_eq!(set.len(), 2);
    /// ```
    #[must_use]
    pub fn from_values<I: IntoIterator<Item = T>>(values: I) -> Self {
        let mut trie = HashTrie::new();
        let mut duplicates = 0_usize;
        for value in values {
            if !trie.insert_dirty(value) {
                duplicates += 1;
            }
        }
        log::trace!(
            "built set of {} values ({duplicates} duplicates replaced)",
            trie.size()
        );
        Self { trie }
    }

    /// Returns the stored element equal to `value`.
    ///
    /// The stored element may differ from `value` in ways its [`Hashable`]
    /// impl ignores.
    #[inline]
    #[must_use]
    pub fn get(&self, value: &T) -> Option<&T> {
        self.trie.lookup(value)
    }

    /// Returns `true` if an element equal to `value` is stored.
    #[inline]
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns a set with `value` added, and whether it was not present
    /// before. An equal element already in the set is replaced by `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` cannot be hashed (see [`Set::try_insert`]).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trieseq::persistent::Set;
    ///
    /// let (set, added) = Set::new().insert(1);
    /// assert!(added);
    /// let (same, added) = set.insert(1);
    /// assert!(!added);
    /// assert_eq!(same.len(), 1);
    /// ```
    #[must_use]
    pub fn insert(&self, value: T) -> (Self, bool) {
        let (trie, added) = self.trie.insert(value);
        (Self { trie }, added)
    }

    /// Like [`Set::insert`], but checks that `value` is hashable first.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Unhashable`] if `value` has no hash. Nothing is
    /// inserted in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trieseq::persistent::{List, Set};
    /// use trieseq::value::Value;
    ///
    /// let set: Set<Value> = Set::new();
    /// assert!(set.try_insert(Value::from(1)).is_ok());
    /// assert!(set.try_insert(Value::from(List::new())).is_err());
    /// ```
    pub fn try_insert(&self, value: T) -> Result<(Self, bool), HashError> {
        value.try_hash(0)?;
        Ok(self.insert(value))
    }

    /// Returns a set without `value`, and whether it was present.
    #[must_use]
    pub fn remove(&self, value: &T) -> (Self, bool) {
        let (trie, removed) = self.trie.delete(value);
        (Self { trie }, removed)
    }

    /// Finds an element by a seed-indexed hash and a match predicate.
    pub(crate) fn get_by<H, M>(&self, hash: H, matches: M) -> Option<&T>
    where
        H: Fn(u32) -> usize,
        M: Fn(&T) -> bool,
    {
        self.trie.lookup_by(hash, matches)
    }

    /// Removes an element found by a seed-indexed hash and a match predicate.
    pub(crate) fn remove_by<H, M>(&self, hash: H, matches: M) -> (Self, bool)
    where
        H: Fn(u32) -> usize,
        M: Fn(&T) -> bool,
    {
        let (trie, removed) = self.trie.delete_by(hash, matches);
        (Self { trie }, removed)
    }

    // =========================================================================
    // Set algebra
    // =========================================================================

    /// Elements of either. Elements of `other` replace equal elements here.
    ///
    /// `other` is consumed with `first_rest` until it is exhausted, so it
    /// must be finite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trieseq::persistent::{List, Set};
    ///
    /// let set = Set::from_values([1, 2]);
    /// let merged = set.union(&List::from_values([2, 3]));
    /// assert_eq!(merged.len(), 3);
    /// ```
    #[must_use]
    pub fn union<S: Sequence<Item = T>>(&self, other: &S) -> Self {
        Self {
            trie: self.trie.union(other),
        }
    }

    /// Elements of `other` that are also in this set.
    #[must_use]
    pub fn intersection<S: Sequence<Item = T>>(&self, other: &S) -> Self {
        Self {
            trie: self.trie.intersection(other),
        }
    }

    /// Elements of this set that are not in `other`.
    #[must_use]
    pub fn difference<S: Sequence<Item = T>>(&self, other: &S) -> Self {
        Self {
            trie: self.trie.difference(other),
        }
    }

    /// Elements in exactly one of this set and `other`.
    ///
    /// If `other` repeats an element, each repetition toggles it again.
    #[must_use]
    pub fn symmetric_difference<S: Sequence<Item = T>>(&self, other: &S) -> Self {
        Self {
            trie: self.trie.symmetric_difference(other),
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_well_formed(&self) {
        self.trie.assert_well_formed();
    }
}

/// Collects any sequence into a [`Set`].
///
/// # Examples
///
/// ```rust
/// use trieseq::persistent::{List, to_set};
///
/// let set = to_set(&List::from_values([1, 1, 2]));
/// assert_eq!(set.len(), 2);
/// ```
pub fn to_set<S>(sequence: &S) -> Set<S::Item>
where
    S: Sequence,
    S::Item: Clone + Hashable,
{
    Set::from_values(sequence::iter(sequence))
}

impl<T: Clone + Hashable> Sequence for Set<T> {
    type Item = T;

    fn first_rest(&self) -> (Option<T>, Self, bool) {
        let (first, trie, found) = self.trie.first_rest();
        (first, Self { trie }, found)
    }

    #[inline]
    fn size(&self) -> u64 {
        self.trie.size()
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to elements of a [`Set`].
pub struct SetIterator<'a, T> {
    inner: TrieIterator<'a, T>,
}

impl<'a, T> Iterator for SetIterator<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for SetIterator<'_, T> {}

impl<T> std::iter::FusedIterator for SetIterator<'_, T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for Set<T> {
    fn clone(&self) -> Self {
        Self {
            trie: self.trie.clone(),
        }
    }
}

impl<T> Default for Set<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Hashable> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

impl<T: Clone + Hashable> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = sequence::SequenceIntoIter<Self>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        sequence::into_iter(self)
    }
}

impl<'a, T> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = SetIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Two sets are equal when they hold the same number of elements and every
/// element of one is found in the other.
impl<T: Clone + Hashable> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        self.trie.size() == other.trie.size() && self.iter().all(|value| other.contains(value))
    }
}

impl<T: Clone + Hashable> Eq for Set<T> {}

impl<T: fmt::Debug> fmt::Debug for Set<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

/// Renders as `#{ a b c }#`, in trie order.
impl<T: fmt::Display> fmt::Display for Set<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_delimited(formatter, "#{", "}#", self.iter())
    }
}

// =============================================================================
// Tests
// =============================================================================
