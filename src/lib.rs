//! # trieseq
//!
//! Persistent (immutable, structurally shared) collections for Rust, built
//! around a re-hashing 32-ary hash trie.
//!
//! ## Overview
//!
//! - **Persistent Data Structures**: [`List`](persistent::List),
//!   [`Set`](persistent::Set) and [`HashMap`](persistent::HashMap). Every
//!   update returns a new handle and leaves the old one valid and unchanged.
//! - **Hashing**: the [`Hashable`](hashable::Hashable) contract, which asks a
//!   value for a fresh hash at every trie depth.
//! - **Sequences**: one [`Sequence`](sequence::Sequence) contract
//!   ("first element, rest of the same kind") and generic algorithms written
//!   once against it.
//! - **Lazy Sequences**: [`Deferred`](control::Deferred), produced on
//!   background threads and memoized.
//! - **Dynamic Values**: [`Value`](value::Value) for collections that mix
//!   element kinds.
//!
//! ## Feature Flags
//!
//! - `arc`: use `Arc` for shared nodes so structures can cross threads
//!   (otherwise `Rc`)
//! - `deferred`: lazy sequences (implies `arc`)
//!
//! Both are enabled by default.
//!
//! ## Example
//!
//! ```rust
//! use trieseq::prelude::*;
//!
//! let set = Set::from_values([0, 1, 2, 3, 4]);
//! let (without_zero, _) = set.remove(&0);
//! let (refilled, added) = without_zero.insert(5);
//! assert!(added);
//! assert_eq!(refilled.len(), 5);
//! assert!(set.contains(&0));
//!
//! let evens = sequence::filter(&set, |n| n % 2 == 0);
//! assert_eq!(evens.len(), 3);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the collections, the core traits and the `sequence` module.
///
/// # Usage
///
/// ```rust
/// use trieseq::prelude::*;
/// ```
pub mod prelude {
    pub use crate::hashable::Hashable;
    pub use crate::persistent::{Entry, HashMap, List, Set};
    pub use crate::sequence::{self, Sequence};
    pub use crate::value::Value;

    #[cfg(feature = "deferred")]
    pub use crate::control::Deferred;
}

pub mod hashable;
mod macros;
pub mod persistent;
pub mod sequence;
pub mod value;

#[cfg(feature = "deferred")]
pub mod control;
