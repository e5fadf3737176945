//! Persistent (immutable) singly-linked list.
//!
//! This module provides [`List`], the concrete sequence that the generic
//! algorithms in [`sequence`](crate::sequence) produce.
//!
//! # Overview
//!
//! - O(1) prepend, head and tail
//! - O(1) length (cached)
//! - O(n) index access, append and reverse
//!
//! All operations return new lists without modifying the original, and
//! prepending shares every existing cell with the original:
//!
//! ```text
//! list1: 1 -> 2 -> 3 -> nil
//! list2 = list1.prepend(0): 0 -> [1 -> 2 -> 3 -> nil]  // shares [1, 2, 3] with list1
//! ```
//!
//! # Examples
//!
//! ```rust
//! use trieseq::persistent::List;
//!
//! let list = List::from_values([0, 1, 2, 3]);
//! assert_eq!(list.to_string(), "( 0 1 2 3 )");
//!
//! let longer = list.append(4);
//! assert_eq!(list.len(), 4);
//! assert_eq!(longer.nth(4), Some(&4));
//! ```

use std::fmt;
use std::iter::FromIterator;

use super::ReferenceCounter;
use crate::sequence::{self, Sequence, write_delimited};

/// One link of the list.
struct Cell<T> {
    element: T,
    next: Option<ReferenceCounter<Cell<T>>>,
}

/// A persistent (immutable) singly-linked list.
///
/// # Time Complexity
///
/// | Operation     | Complexity |
/// |---------------|------------|
/// | `new`         | O(1)       |
/// | `prepend`     | O(1)       |
/// | `head`/`tail` | O(1)       |
/// | `len`         | O(1)       |
/// | `nth`         | O(n)       |
/// | `append`      | O(n)       |
/// | `prepend_seq` | O(m)       |
/// | `reverse`     | O(n)       |
pub struct List<T> {
    head: Option<ReferenceCounter<Cell<T>>>,
    /// Cached length for O(1) access.
    length: usize,
}

impl<T> List<T> {
    /// Creates a new empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trieseq::persistent::List;
    ///
    /// let list: List<i32> = List::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: None,
            length: 0,
        }
    }

    /// Creates a list containing a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().prepend(element)
    }

    /// Creates a list of `values`, keeping their order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trieseq::persistent::List;
    ///
    /// let list = List::from_values(["a", "b"]);
    /// assert_eq!(list.head(), Some(&"a"));
    /// ```
    #[must_use]
    pub fn from_values<I: IntoIterator<Item = T>>(values: I) -> Self {
        let mut elements: Vec<T> = values.into_iter().collect();
        let mut list = Self::new();
        while let Some(element) = elements.pop() {
            list = list.prepend(element);
        }
        list
    }

    /// Returns the number of elements in the list.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the list contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns a new list with `element` at the front.
    ///
    /// # Complexity
    ///
    /// O(1) time and space
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trieseq::persistent::List;
    ///
    /// let list = List::from_values([3, 2, 1]);
    /// let extended = list.prepend(4);
    /// assert_eq!(extended.to_string(), "( 4 3 2 1 )");
    /// assert_eq!(list.to_string(), "( 3 2 1 )");
    /// ```
    #[inline]
    #[must_use]
    pub fn prepend(&self, element: T) -> Self {
        Self {
            head: Some(ReferenceCounter::new(Cell {
                element,
                next: self.head.clone(),
            })),
            length: self.length + 1,
        }
    }

    /// Returns a reference to the first element.
    #[inline]
    #[must_use]
    pub fn head(&self) -> Option<&T> {
        self.head.as_ref().map(|cell| &cell.element)
    }

    /// Returns the list without its first element. The tail of an empty list
    /// is empty.
    #[inline]
    #[must_use]
    pub fn tail(&self) -> Self {
        self.head.as_ref().map_or_else(Self::new, |cell| Self {
            head: cell.next.clone(),
            length: self.length.saturating_sub(1),
        })
    }

    /// Decomposes the list into its head and tail.
    #[inline]
    #[must_use]
    pub fn uncons(&self) -> Option<(&T, Self)> {
        self.head.as_ref().map(|cell| {
            let tail = Self {
                head: cell.next.clone(),
                length: self.length.saturating_sub(1),
            };
            (&cell.element, tail)
        })
    }

    /// Returns the element at zero-based position `index`, or `None` when
    /// out of bounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trieseq::persistent::List;
    ///
    /// let list = List::from_values([0, 1, 2]);
    /// assert_eq!(list.nth(2), Some(&2));
    /// assert_eq!(list.nth(3), None);
    /// ```
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<&T> {
        self.iter().nth(index)
    }

    /// Returns an iterator over references to the elements.
    #[inline]
    pub fn iter(&self) -> ListIterator<'_, T> {
        ListIterator {
            current: self.head.as_deref(),
            remaining: self.length,
        }
    }
}

impl<T: Clone> List<T> {
    /// Returns a new list with `element` at the end.
    ///
    /// Unlike [`prepend`](Self::prepend) this copies every cell.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn append(&self, element: T) -> Self {
        let mut elements: Vec<T> = self.iter().cloned().collect();
        elements.push(element);
        Self::from_values(elements)
    }

    /// Returns the elements of `prefix` followed by this list. This list's
    /// cells are shared, not copied.
    ///
    /// # Complexity
    ///
    /// O(m) where m is the length of `prefix`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trieseq::persistent::List;
    ///
    /// let list = List::from_values([3, 4]);
    /// let prefixed = list.prepend_seq(&List::from_values([1, 2]));
    /// assert_eq!(prefixed.to_string(), "( 1 2 3 4 )");
    /// ```
    #[must_use]
    pub fn prepend_seq<S: Sequence<Item = T>>(&self, prefix: &S) -> Self {
        let mut elements: Vec<T> = sequence::iter(prefix).collect();
        let mut list = self.clone();
        while let Some(element) = elements.pop() {
            list = list.prepend(element);
        }
        list
    }

    /// Returns the list in reverse order.
    #[must_use]
    pub fn reverse(&self) -> Self {
        self.iter()
            .fold(Self::new(), |reversed, element| reversed.prepend(element.clone()))
    }
}

impl<T: Clone> Sequence for List<T> {
    type Item = T;

    /// O(1): the rest is the shared tail.
    fn first_rest(&self) -> (Option<T>, Self, bool) {
        match self.uncons() {
            Some((head, tail)) => (Some(head.clone()), tail, true),
            None => (None, Self::new(), false),
        }
    }

    #[inline]
    fn size(&self) -> u64 {
        self.length as u64
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to elements of a [`List`].
pub struct ListIterator<'a, T> {
    current: Option<&'a Cell<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for ListIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.current.map(|cell| {
            self.current = cell.next.as_deref();
            self.remaining = self.remaining.saturating_sub(1);
            &cell.element
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for ListIterator<'_, T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for List<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            length: self.length,
        }
    }
}

/// Unlinks uniquely owned cells one at a time so that dropping a long list
/// does not recurse once per cell.
impl<T> Drop for List<T> {
    fn drop(&mut self) {
        let mut current = self.head.take();
        while let Some(cell) = current {
            current = ReferenceCounter::into_inner(cell).and_then(|mut cell| cell.next.take());
        }
    }
}

impl<T> Default for List<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

impl<T: Clone> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = sequence::SequenceIntoIter<Self>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        sequence::into_iter(self)
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = ListIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

/// Renders as `( a b c )`.
impl<T: fmt::Display> fmt::Display for List<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_delimited(formatter, "(", ")", self.iter())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_creates_empty() {
        let list: List<i32> = List::new();
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.size(), 0);
    }

    #[rstest]
    fn test_from_values_keeps_order() {
        let list = List::from_values([1, 2, 3]);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(list.len(), 3);
    }

    #[rstest]
    fn test_prepend_shares_tail() {
        let list = List::from_values([3, 2, 1, 0]);
        let extended = list.prepend(4);

        assert_eq!(list.len(), 4);
        assert_eq!(extended.len(), 5);
        assert!(ReferenceCounter::ptr_eq(
            list.head.as_ref().unwrap(),
            extended.head.as_ref().unwrap().next.as_ref().unwrap(),
        ));
    }

    #[rstest]
    fn test_append_copies_and_leaves_original() {
        let list = List::from_values([0, 1]);
        let appended = list.append(2);
        assert_eq!(appended.to_string(), "( 0 1 2 )");
        assert_eq!(list.to_string(), "( 0 1 )");

        let from_empty = List::new().append(7);
        assert_eq!(from_empty.to_string(), "( 7 )");
    }

    #[rstest]
    fn test_prepend_seq() {
        let list = List::from_values([3, 4]);
        let empty: List<i32> = List::new();

        assert_eq!(list.prepend_seq(&empty), list);
        assert_eq!(empty.prepend_seq(&list), list);
        assert_eq!(
            list.prepend_seq(&List::from_values([0, 1, 2])).to_string(),
            "( 0 1 2 3 4 )"
        );
    }

    #[rstest]
    #[case(0, Some(0))]
    #[case(3, Some(3))]
    #[case(4, None)]
    fn test_nth(#[case] index: usize, #[case] expected: Option<i32>) {
        let list = List::from_values([0, 1, 2, 3]);
        assert_eq!(list.nth(index).copied(), expected);
    }

    #[rstest]
    fn test_equal_compares_nested_lists() {
        let left = List::from_values([List::from_values([3]), List::from_values([1, 2])]);
        let right = List::new()
            .prepend(List::from_values([1, 2]))
            .prepend(List::from_values([3]));
        assert_eq!(left, right);
        assert_ne!(left, List::from_values([List::from_values([3])]));
    }

    #[rstest]
    fn test_display() {
        assert_eq!(List::from_values([0, 1, 2, 3]).to_string(), "( 0 1 2 3 )");
        assert_eq!(List::<i32>::new().to_string(), "( )");
    }

    #[rstest]
    fn test_dropping_long_list_does_not_overflow() {
        let list = List::from_values(0..200_000);
        assert_eq!(list.len(), 200_000);
        drop(list);
    }
}
