//! Eager algorithms over any [`Sequence`].
//!
//! Each walks its input with `first_rest`, leaves the input untouched, and
//! collects into a [`List`] in input order. `drop_first` and `drop_while`
//! instead return the remainder of the input itself, so they keep its kind.

use std::fmt;
use std::ops::ControlFlow;

use super::{Sequence, iter, write_delimited};
use crate::persistent::List;

/// Collects the elements of `sequence` into a `Vec`, in sequence order.
pub fn to_vec<S: Sequence>(sequence: &S) -> Vec<S::Item> {
    iter(sequence).collect()
}

/// Collects the elements of `sequence` into a [`List`], in sequence order.
pub fn to_list<S: Sequence>(sequence: &S) -> List<S::Item> {
    List::from_values(iter(sequence))
}

/// Returns the elements of `sequence` in reverse order.
pub fn reverse<S: Sequence>(sequence: &S) -> List<S::Item> {
    iter(sequence).fold(List::new(), |reversed, element| reversed.prepend(element))
}

/// Applies `function` to every element.
pub fn map<S, U, F>(sequence: &S, function: F) -> List<U>
where
    S: Sequence,
    F: FnMut(S::Item) -> U,
{
    List::from_values(iter(sequence).map(function))
}

/// Folds `sequence` into an accumulator.
///
/// Returning [`ControlFlow::Break`] stops the reduction early; remaining
/// elements are never requested.
///
/// # Examples
///
/// ```rust
/// use std::ops::ControlFlow;
/// use trieseq::persistent::List;
/// use trieseq::sequence;
///
/// let list = List::from_values([1, 2, 3, 4]);
/// let sum = sequence::reduce(&list, 0, |sum, n| ControlFlow::Continue(sum + n));
/// assert_eq!(sum, 10);
///
/// let until_three = sequence::reduce(&list, 0, |sum, n| {
///     if n > 2 { ControlFlow::Break(sum + n) } else { ControlFlow::Continue(sum + n) }
/// });
/// assert_eq!(until_three, 6);
/// ```
pub fn reduce<S, A, F>(sequence: &S, initial: A, mut function: F) -> A
where
    S: Sequence,
    F: FnMut(A, S::Item) -> ControlFlow<A, A>,
{
    let mut accumulator = initial;
    for element in iter(sequence) {
        match function(accumulator, element) {
            ControlFlow::Continue(next) => accumulator = next,
            ControlFlow::Break(last) => return last,
        }
    }
    accumulator
}

/// Returns the first element matching `predicate`.
pub fn any<S, P>(sequence: &S, mut predicate: P) -> Option<S::Item>
where
    S: Sequence,
    P: FnMut(&S::Item) -> bool,
{
    iter(sequence).find(|element| predicate(element))
}

/// Returns `true` if every element matches `predicate`. Vacuously true for an
/// empty sequence.
pub fn all<S, P>(sequence: &S, mut predicate: P) -> bool
where
    S: Sequence,
    P: FnMut(&S::Item) -> bool,
{
    iter(sequence).all(|element| predicate(&element))
}

/// Keeps the elements matching `predicate`.
pub fn filter<S, P>(sequence: &S, mut predicate: P) -> List<S::Item>
where
    S: Sequence,
    P: FnMut(&S::Item) -> bool,
{
    List::from_values(iter(sequence).filter(|element| predicate(element)))
}

/// Element types that may themselves hold a list of elements.
///
/// [`flatten`] splices such elements into its output one level deep.
pub trait Nested: Sized {
    /// Returns the nested list, or gives the element back if it is a leaf.
    ///
    /// # Errors
    ///
    /// Returns `Err(self)` when the element is not a nested list.
    fn into_nested(self) -> Result<List<Self>, Self>;
}

/// Splices nested lists one level deep; other elements pass through.
///
/// # Examples
///
/// ```rust
/// use trieseq::persistent::List;
/// use trieseq::sequence;
/// use trieseq::value::Value;
///
/// let inner = Value::from(List::from_values([Value::from(1), Value::from(2)]));
/// let outer = List::from_values([Value::from(0), inner, Value::from(3)]);
///
/// let flat = sequence::flatten(&outer);
/// assert_eq!(flat.to_string(), "( 0 1 2 3 )");
/// ```
pub fn flatten<S>(sequence: &S) -> List<S::Item>
where
    S: Sequence,
    S::Item: Nested + Clone,
{
    let mut flattened = Vec::new();
    for element in iter(sequence) {
        match element.into_nested() {
            Ok(nested) => flattened.extend(nested),
            Err(leaf) => flattened.push(leaf),
        }
    }
    List::from_values(flattened)
}

/// Concatenates a sequence of sequences.
pub fn concat<S, I>(sequence: &S) -> List<I::Item>
where
    S: Sequence<Item = I>,
    I: Sequence,
{
    let mut concatenated = Vec::new();
    for inner in iter(sequence) {
        concatenated.extend(iter(&inner));
    }
    List::from_values(concatenated)
}

/// Returns at most the first `count` elements.
///
/// Only `count` elements are requested, so this is safe on unbounded lazy
/// sequences.
pub fn take<S: Sequence>(sequence: &S, count: u64) -> List<S::Item> {
    let count = usize::try_from(count).unwrap_or(usize::MAX);
    List::from_values(iter(sequence).take(count))
}

/// Returns the leading elements matching `predicate`.
pub fn take_while<S, P>(sequence: &S, mut predicate: P) -> List<S::Item>
where
    S: Sequence,
    P: FnMut(&S::Item) -> bool,
{
    List::from_values(iter(sequence).take_while(|element| predicate(element)))
}

/// Skips the first `count` elements and returns the rest of `sequence`.
///
/// Skipping past the end yields the empty structure.
pub fn drop_first<S: Sequence>(sequence: S, count: u64) -> S {
    let mut current = sequence;
    for _ in 0..count {
        let (_, rest, found) = current.first_rest();
        current = rest;
        if !found {
            break;
        }
    }
    current
}

/// Skips leading elements matching `predicate` and returns the rest of
/// `sequence`, starting at the first element that fails it.
pub fn drop_while<S, P>(sequence: S, mut predicate: P) -> S
where
    S: Sequence,
    P: FnMut(&S::Item) -> bool,
{
    let mut current = sequence;
    loop {
        let (first, rest, found) = current.first_rest();
        match first {
            Some(element) if found && predicate(&element) => current = rest,
            _ if !found => return rest,
            _ => return current,
        }
    }
}

/// Renders `sequence` between `open` and `close`, elements separated by spaces.
///
/// # Examples
///
/// ```rust
/// use trieseq::persistent::List;
/// use trieseq::sequence;
///
/// let list = List::from_values([1, 2, 3]);
/// assert_eq!(sequence::render(&list, "[", "]"), "[ 1 2 3 ]");
/// ```
pub fn render<S>(sequence: &S, open: &str, close: &str) -> String
where
    S: Sequence,
    S::Item: fmt::Display,
{
    struct Rendered<'a, S> {
        sequence: &'a S,
        open: &'a str,
        close: &'a str,
    }

    impl<S> fmt::Display for Rendered<'_, S>
    where
        S: Sequence,
        S::Item: fmt::Display,
    {
        fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_delimited(formatter, self.open, self.close, iter(self.sequence))
        }
    }

    Rendered {
        sequence,
        open,
        close,
    }
    .to_string()
}

// =============================================================================
// Tests
// =============================================================================
