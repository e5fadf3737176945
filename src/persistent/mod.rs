//! Persistent (immutable) data structures.
//!
//! This module provides immutable collections that use structural sharing
//! to avoid copying:
//!
//! - [`List`]: Persistent singly-linked list
//! - [`Set`]: Persistent hash set backed by a re-hashing 32-ary trie
//! - [`HashMap`]: Persistent key/value map built on [`Set`]
//!
//! # Structural Sharing
//!
//! Every operation that "modifies" a structure returns a new handle. Only the
//! nodes on the path being changed are copied; everything else is shared by
//! reference with the previous version, which remains valid and unchanged.
//!
//! # Examples
//!
//! ## `List`
//!
//! ```rust
//! use trieseq::persistent::List;
//!
//! let list = List::new().prepend(3).prepend(2).prepend(1);
//! assert_eq!(list.head(), Some(&1));
//!
//! let extended = list.prepend(0);
//! assert_eq!(list.len(), 3);     // Original unchanged
//! assert_eq!(extended.len(), 4); // New list
//! ```
//!
//! ## `Set`
//!
//! ```rust
//! use trieseq::persistent::Set;
//!
//! let set = Set::from_values([1, 2, 3]);
//! let (updated, added) = set.insert(4);
//! assert!(added);
//! assert_eq!(set.len(), 3);      // Original unchanged
//! assert_eq!(updated.len(), 4);  // New version
//!
//! let other = Set::from_values([2, 3, 4]);
//! assert_eq!(set.union(&other).len(), 4);
//! assert_eq!(set.intersection(&other).len(), 2);
//! ```
//!
//! ## `HashMap`
//!
//! ```rust
//! use trieseq::persistent::HashMap;
//!
//! let (map, _) = HashMap::new().insert("one".to_string(), 1);
//! let (updated, added) = map.insert("one".to_string(), 100);
//! assert!(!added);
//! assert_eq!(map.get(&"one".to_string()), Some(&1));       // Original unchanged
//! assert_eq!(updated.get(&"one".to_string()), Some(&100)); // New version
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled (the default), this is `std::sync::Arc`,
/// which lets structures and their shared nodes cross threads.
///
/// When the `arc` feature is disabled, this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub type ReferenceCounter<T> = std::sync::Arc<T>;

/// Reference-counted smart pointer type.
///
/// With the `arc` feature disabled this is `std::rc::Rc`; structures built
/// on it stay on the thread that created them.
#[cfg(not(feature = "arc"))]
pub type ReferenceCounter<T> = std::rc::Rc<T>;

/// Branching factor of the hash trie.
///
/// Fixed for the lifetime of the crate; every node in every trie uses it.
pub const ARITY: usize = 32;

mod hashmap;
mod hashset;
mod list;
mod trie;

pub use hashmap::{Entry, HashMap};
pub use hashset::{Set, SetIterator, to_set};
pub use list::{List, ListIterator};

// =============================================================================
// Tests
// =============================================================================
