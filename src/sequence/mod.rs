//! The uniform sequence contract.
//!
//! Every structure in this crate ([`List`](crate::persistent::List), [`Set`](crate::persistent::Set),
//! [`HashMap`](crate::persistent::HashMap) and, with the `deferred` feature,
//! [`Deferred`](crate::control::Deferred)) implements [`Sequence`]: a way to
//! split off a "first" element and get the rest as a structure of the same
//! kind. Generic algorithms are written once against this contract and
//! produce a `List` unless noted otherwise.
//!
//! # Examples
//!
//! ```rust
//! use trieseq::persistent::List;
//! use trieseq::sequence::{self, Sequence};
//!
//! let list = List::from_values(0..10);
//!
//! let incremented_evens = sequence::filter(&sequence::map(&list, |n| n + 1), |n| n % 2 == 0);
//! let evens_incremented = sequence::map(&sequence::filter(&list, |n| n % 2 == 0), |n| n + 1);
//!
//! assert_eq!(sequence::to_vec(&incremented_evens), vec![2, 4, 6, 8, 10]);
//! assert_eq!(sequence::to_vec(&evens_incremented), vec![1, 3, 5, 7, 9]);
//! assert_eq!(list.size(), 10);
//! ```

mod combinators;

use std::fmt;
use std::iter::FusedIterator;

pub use combinators::{
    Nested, all, any, concat, drop_first, drop_while, filter, flatten, map, reduce, render,
    reverse, take, take_while, to_list, to_vec,
};

// =============================================================================
// Sequence Definition
// =============================================================================

/// A structure that can be consumed one element at a time.
///
/// # Laws
///
/// - `first_rest` never modifies `self`; the rest is a new handle.
/// - On an empty sequence `first_rest` returns `(None, <empty>, false)`, and
///   calling it again on that empty rest returns the same answer.
/// - `found` is `true` exactly when an element was split off.
pub trait Sequence: Sized {
    /// The element type.
    type Item;

    /// Splits off the first element.
    ///
    /// For unordered structures the "first" element is arbitrary but
    /// deterministic for a given structure.
    fn first_rest(&self) -> (Option<Self::Item>, Self, bool);

    /// Returns the number of elements.
    ///
    /// The default walks the whole sequence; structures that track their size
    /// override it with an O(1) answer.
    fn size(&self) -> u64 {
        let mut count = 0;
        let (_, mut rest, mut found) = self.first_rest();
        while found {
            count += 1;
            (_, rest, found) = rest.first_rest();
        }
        count
    }
}

/// Returns the size of `sequence`.
#[inline]
pub fn size<S: Sequence>(sequence: &S) -> u64 {
    sequence.size()
}

// =============================================================================
// Iterator Adapter
// =============================================================================

enum IteratorState<'a, S> {
    Borrowed(&'a S),
    Owned(S),
    Exhausted,
}

/// A standard [`Iterator`] over any [`Sequence`], driven by `first_rest`.
///
/// Elements are produced on demand, so iterating a lazy sequence only
/// forces as much of it as is consumed.
pub struct SequenceIterator<'a, S> {
    state: IteratorState<'a, S>,
}

impl<S: Sequence> Iterator for SequenceIterator<'_, S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let (first, rest, found) = match &self.state {
            IteratorState::Borrowed(sequence) => sequence.first_rest(),
            IteratorState::Owned(sequence) => sequence.first_rest(),
            IteratorState::Exhausted => return None,
        };
        if found {
            self.state = IteratorState::Owned(rest);
            first
        } else {
            self.state = IteratorState::Exhausted;
            None
        }
    }
}

impl<S: Sequence> FusedIterator for SequenceIterator<'_, S> {}

/// Iterates `sequence` without consuming the handle.
pub const fn iter<S: Sequence>(sequence: &S) -> SequenceIterator<'_, S> {
    SequenceIterator {
        state: IteratorState::Borrowed(sequence),
    }
}

/// An owning [`Iterator`] over any [`Sequence`], driven by `first_rest`.
pub struct SequenceIntoIter<S> {
    current: Option<S>,
}

impl<S: Sequence> Iterator for SequenceIntoIter<S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let (first, rest, found) = self.current.as_ref()?.first_rest();
        self.current = found.then_some(rest);
        first
    }
}

impl<S: Sequence> FusedIterator for SequenceIntoIter<S> {}

/// Iterates `sequence`, taking ownership of the handle.
pub const fn into_iter<S: Sequence>(sequence: S) -> SequenceIntoIter<S> {
    SequenceIntoIter {
        current: Some(sequence),
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Writes `open`, each item followed by a space, then `close`.
///
/// An empty sequence renders as `"{open} {close}"`.
pub(crate) fn write_delimited<I>(
    formatter: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    items: I,
) -> fmt::Result
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    write!(formatter, "{open} ")?;
    for item in items {
        write!(formatter, "{item} ")?;
    }
    formatter.write_str(close)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::List;
    use rstest::rstest;

    #[rstest]
    fn test_default_size_walks_sequence() {
        struct Countdown(u8);

        impl Sequence for Countdown {
            type Item = u8;

            fn first_rest(&self) -> (Option<u8>, Self, bool) {
                match self.0 {
                    0 => (None, Self(0), false),
                    remaining => (Some(remaining), Self(remaining - 1), true),
                }
            }
        }

        assert_eq!(Countdown(5).size(), 5);
        assert_eq!(Countdown(0).size(), 0);
        assert_eq!(into_iter(Countdown(3)).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[rstest]
    fn test_iter_leaves_sequence_untouched() {
        let list = List::from_values([1, 2, 3]);
        let collected: Vec<i32> = iter(&list).collect();
        assert_eq!(collected, vec![1, 2, 3]);
        assert_eq!(list.len(), 3);
    }

    #[rstest]
    fn test_iterator_is_fused() {
        let list = List::from_values([1]);
        let mut iterator = iter(&list);
        assert_eq!(iterator.next(), Some(1));
        assert_eq!(iterator.next(), None);
        assert_eq!(iterator.next(), None);
    }

    #[rstest]
    fn test_list_first_rest_on_empty_is_idempotent() {
        let empty: List<i32> = List::new();
        let (first, rest, found) = empty.first_rest();
        assert_eq!((first, found), (None, false));
        let (first, rest, found) = rest.first_rest();
        assert_eq!((first, found), (None, false));
        assert!(rest.is_empty());
    }
}
