//! Lazy evaluation.
//!
//! This module provides [`Deferred`], a sequence whose elements are produced
//! on demand by background producer threads and cached once produced, along
//! with lazy counterparts of the eager algorithms in
//! [`sequence`](crate::sequence):
//!
//! - [`lazy_map`], [`lazy_filter`], [`lazy_take`], [`lazy_take_while`]
//! - [`to_deferred`]: wrap any sequence
//!
//! Requires the `deferred` feature.
//!
//! # Examples
//!
//! ```rust
//! use trieseq::control::{lazy_map, to_deferred};
//! use trieseq::persistent::List;
//! use trieseq::sequence;
//!
//! let doubled = lazy_map(to_deferred(List::from_values([1, 2, 3])), |n| n * 2);
//! assert_eq!(sequence::to_vec(&doubled), vec![2, 4, 6]);
//! ```

mod deferred;

pub use deferred::{
    Deferred, DeferredPoisonedError, Thunk, lazy_filter, lazy_map, lazy_take, lazy_take_while,
    to_deferred,
};
