//! Lazily produced sequences.
//!
//! A [`Deferred`] node holds a thunk that, when first demanded, yields one
//! element plus the node after it. The thunk runs on a background producer
//! thread while every reader of the node waits on a one-shot cell; the result
//! is cached there, so the producer runs at most once per node no matter how
//! many handles read it or how often.
//!
//! # Poisoning
//!
//! If a producer panics, its node becomes **poisoned**. Every later read of
//! that node panics with [`DeferredPoisonedError`]; use
//! [`Deferred::try_first_rest`] to observe the failure as a `Result`.
//!
//! # Re-entry Warning
//!
//! A thunk must not read the node it is producing. Doing so waits on itself
//! forever.
//!
//! # Examples
//!
//! ```rust
//! use trieseq::control::{Deferred, lazy_filter, lazy_map, lazy_take};
//! use trieseq::sequence;
//!
//! let naturals = Deferred::from_fn(0_u64, |n| Some((n, n + 1)));
//! let odd_squares = lazy_filter(lazy_map(naturals, |n| n * n), |n| n % 2 == 1);
//!
//! let first_three = lazy_take(odd_squares, 3);
//! assert_eq!(sequence::to_vec(&first_three), vec![1, 9, 25]);
//! ```

use std::fmt;
use std::mem;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread;

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::persistent::ReferenceCounter;
use crate::sequence::Sequence;

/// Error returned when a [`Deferred`] node's producer panicked.
///
/// [`Deferred::first_rest`](Sequence::first_rest) panics with this message
/// instead of returning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredPoisonedError;

impl fmt::Display for DeferredPoisonedError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Deferred: producer panicked")
    }
}

impl std::error::Error for DeferredPoisonedError {}

/// Producer of one [`Deferred`] node: the element and the node after it, or
/// `None` at the end of the sequence.
pub type Thunk<T> = Box<dyn FnOnce() -> Option<(T, Deferred<T>)> + Send>;

enum State<T> {
    /// Nobody has asked for the element yet.
    Pending(Thunk<T>),
    /// A producer has been started but has not picked up the thunk.
    Requested(Thunk<T>),
    /// The thunk is running.
    Running,
    Ready(Option<(T, Deferred<T>)>),
    Poisoned,
}

struct Cell<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

/// A lazily produced, memoized sequence.
///
/// Cloning a handle is O(1); clones share the node and its cached result.
///
/// # Examples
///
/// ```rust
/// use trieseq::control::Deferred;
/// use trieseq::sequence::Sequence;
///
/// let single = Deferred::new(|| Some((42, Deferred::empty())));
/// let (first, rest, found) = single.first_rest();
/// assert_eq!((first, found), (Some(42), true));
/// assert_eq!(rest.size(), 0);
/// ```
pub struct Deferred<T> {
    cell: ReferenceCounter<Cell<T>>,
}

impl<T> Deferred<T> {
    fn with_state(state: State<T>) -> Self {
        Self {
            cell: ReferenceCounter::new(Cell {
                state: Mutex::new(state),
                ready: Condvar::new(),
            }),
        }
    }

    /// The exhausted sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_state(State::Ready(None))
    }

    /// A node whose element is already known.
    #[must_use]
    pub fn cons(value: T, rest: Self) -> Self {
        Self::with_state(State::Ready(Some((value, rest))))
    }

    /// Returns `true` once this node's element has been produced (or the
    /// node is known to be the end).
    #[must_use]
    pub fn is_forced(&self) -> bool {
        matches!(*self.cell.state.lock(), State::Ready(_))
    }

    /// Returns `true` if this node's producer panicked.
    #[must_use]
    pub fn is_poisoned(&self) -> bool {
        matches!(*self.cell.state.lock(), State::Poisoned)
    }
}

impl<T: Send + 'static> Deferred<T> {
    /// A node produced by `thunk` on first demand.
    pub fn new<F>(thunk: F) -> Self
    where
        F: FnOnce() -> Option<(T, Self)> + Send + 'static,
    {
        Self::with_state(State::Pending(Box::new(thunk)))
    }

    /// An unbounded generator: `step` maps a state to the next element and
    /// the state after it, or `None` to end the sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trieseq::control::Deferred;
    /// use trieseq::sequence;
    ///
    /// let countdown = Deferred::from_fn(3, |n| (n > 0).then_some((n, n - 1)));
    /// assert_eq!(sequence::to_vec(&countdown), vec![3, 2, 1]);
    /// ```
    pub fn from_fn<S, F>(seed: S, step: F) -> Self
    where
        S: Send + 'static,
        F: Fn(S) -> Option<(T, S)> + Send + Sync + 'static,
    {
        unfold(seed, ReferenceCounter::new(step))
    }

    /// Starts a producer for the requested thunk. Falls back to producing on
    /// the calling thread when no thread can be spawned.
    fn spawn_producer(cell: &ReferenceCounter<Cell<T>>) {
        let producer_cell = ReferenceCounter::clone(cell);
        let spawned = thread::Builder::new()
            .name("deferred-producer".to_string())
            .spawn(move || run_producer(&producer_cell));
        if let Err(error) = spawned {
            log::warn!("could not start producer thread ({error}); producing inline");
            run_producer(cell);
        }
    }
}

fn unfold<T, S, F>(seed: S, step: ReferenceCounter<F>) -> Deferred<T>
where
    T: Send + 'static,
    S: Send + 'static,
    F: Fn(S) -> Option<(T, S)> + Send + Sync + 'static,
{
    Deferred::new(move || {
        let (value, next) = step(seed)?;
        Some((value, unfold(next, step)))
    })
}

fn run_producer<T>(cell: &Cell<T>) {
    let thunk = {
        let mut state = cell.state.lock();
        match mem::replace(&mut *state, State::Running) {
            State::Requested(thunk) => thunk,
            other => {
                *state = other;
                return;
            }
        }
    };

    log::trace!("producing deferred element");
    let outcome = catch_unwind(AssertUnwindSafe(thunk));

    let mut state = cell.state.lock();
    *state = match outcome {
        Ok(result) => State::Ready(result),
        Err(_) => {
            log::error!("deferred producer panicked; node poisoned");
            State::Poisoned
        }
    };
    cell.ready.notify_all();
}

impl<T: Clone + Send + 'static> Deferred<T> {
    /// Waits for this node's element, starting its producer if nobody has.
    fn force(&self) -> Result<Option<(T, Self)>, DeferredPoisonedError> {
        let mut state = self.cell.state.lock();
        loop {
            match &*state {
                State::Ready(result) => return Ok(result.clone()),
                State::Poisoned => return Err(DeferredPoisonedError),
                State::Requested(_) | State::Running => self.cell.ready.wait(&mut state),
                State::Pending(_) => {
                    if let State::Pending(thunk) = mem::replace(&mut *state, State::Running) {
                        *state = State::Requested(thunk);
                    }
                    MutexGuard::unlocked(&mut state, || Self::spawn_producer(&self.cell));
                }
            }
        }
    }

    /// Fallible form of [`first_rest`](Sequence::first_rest).
    ///
    /// # Errors
    ///
    /// Returns [`DeferredPoisonedError`] if this node's producer panicked.
    pub fn try_first_rest(&self) -> Result<(Option<T>, Self, bool), DeferredPoisonedError> {
        Ok(match self.force()? {
            Some((value, rest)) => (Some(value), rest, true),
            None => (None, self.clone(), false),
        })
    }
}

impl<T: Clone + Send + 'static> Sequence for Deferred<T> {
    type Item = T;

    /// Blocks until the element is produced.
    ///
    /// # Panics
    ///
    /// Panics with [`DeferredPoisonedError`] if the producer panicked.
    fn first_rest(&self) -> (Option<T>, Self, bool) {
        match self.try_first_rest() {
            Ok(split) => split,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            cell: ReferenceCounter::clone(&self.cell),
        }
    }
}

/// Frees a forced chain one node at a time. Each uniquely owned node gives up
/// its successor before it is dropped, so no drop recurses into the next.
impl<T> Drop for Deferred<T> {
    fn drop(&mut self) {
        let mut next = detach_successor(&mut self.cell);
        while let Some(mut node) = next {
            next = detach_successor(&mut node.cell);
        }
    }
}

/// Takes the cached successor out of a node nobody else holds.
fn detach_successor<T>(cell: &mut ReferenceCounter<Cell<T>>) -> Option<Deferred<T>> {
    let state = ReferenceCounter::get_mut(cell)?.state.get_mut();
    if !matches!(state, State::Ready(Some(_))) {
        return None;
    }
    match mem::replace(state, State::Ready(None)) {
        State::Ready(Some((_, next))) => Some(next),
        _ => None,
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.cell.state.lock() {
            State::Ready(Some((value, _))) => write!(formatter, "Deferred({value:?}, ..)"),
            State::Ready(None) => formatter.write_str("<empty>"),
            State::Pending(_) | State::Requested(_) | State::Running => {
                formatter.write_str("<uninit>")
            }
            State::Poisoned => formatter.write_str("<poisoned>"),
        }
    }
}

// =============================================================================
// Lazy combinators
// =============================================================================

/// Wraps any sequence so that its elements are split off on demand.
pub fn to_deferred<S>(sequence: S) -> Deferred<S::Item>
where
    S: Sequence + Send + 'static,
    S::Item: Send + 'static,
{
    Deferred::from_fn(sequence, |current| {
        let (Some(first), rest, true) = current.first_rest() else {
            return None;
        };
        Some((first, rest))
    })
}

/// Applies `function` to each element as it is demanded.
pub fn lazy_map<S, U, F>(sequence: S, function: F) -> Deferred<U>
where
    S: Sequence + Send + 'static,
    U: Send + 'static,
    F: Fn(S::Item) -> U + Send + Sync + 'static,
{
    Deferred::from_fn(sequence, move |current| {
        let (Some(first), rest, true) = current.first_rest() else {
            return None;
        };
        Some((function(first), rest))
    })
}

/// Keeps the elements matching `predicate`.
///
/// Demanding an element scans forward until a match, so an unbounded source
/// with no further matches never answers.
pub fn lazy_filter<S, P>(sequence: S, predicate: P) -> Deferred<S::Item>
where
    S: Sequence + Send + 'static,
    S::Item: Send + 'static,
    P: Fn(&S::Item) -> bool + Send + Sync + 'static,
{
    Deferred::from_fn(sequence, move |mut current| loop {
        let (Some(first), rest, true) = current.first_rest() else {
            return None;
        };
        if predicate(&first) {
            return Some((first, rest));
        }
        current = rest;
    })
}

/// At most the first `count` elements. Nothing past them is demanded.
pub fn lazy_take<S>(sequence: S, count: u64) -> Deferred<S::Item>
where
    S: Sequence + Send + 'static,
    S::Item: Send + 'static,
{
    Deferred::from_fn((sequence, count), |(current, remaining)| {
        if remaining == 0 {
            return None;
        }
        let (Some(first), rest, true) = current.first_rest() else {
            return None;
        };
        Some((first, (rest, remaining - 1)))
    })
}

/// The leading elements matching `predicate`.
pub fn lazy_take_while<S, P>(sequence: S, predicate: P) -> Deferred<S::Item>
where
    S: Sequence + Send + 'static,
    S::Item: Send + 'static,
    P: Fn(&S::Item) -> bool + Send + Sync + 'static,
{
    Deferred::from_fn(sequence, move |current| {
        let (Some(first), rest, true) = current.first_rest() else {
            return None;
        };
        predicate(&first).then_some((first, rest))
    })
}
