//! Persistent 32-ary hash trie.
//!
//! This is the structure behind [`Set`](super::Set) and, through it,
//! [`HashMap`](super::HashMap).
//!
//! # Layout
//!
//! Every node may hold one value *and* up to [`ARITY`] children. A value is
//! stored at the first node on its path that is free (or already holds an
//! equal value). The child slot taken at depth `d` is
//! `dispatch_hash(value, d)`, so each level asks the value for a fresh hash
//! instead of slicing bits out of a single one.
//!
//! ```text
//!              [a | children]            depth 0: a occupies the root
//!              /            \
//!   slot h(b, 0)            slot h(c, 0)
//!      [b]                  [c | children]
//!                                \
//!                           slot h(d, 1)
//!                               [d]
//! ```
//!
//! # Invariants
//!
//! - `size` of every node is the exact number of values in its subtree.
//! - A node with `size == 0` is never stored; the empty trie is the absent
//!   root and empty child slots are `None`.
//! - Nodes reachable from a handle are never mutated. Persistent operations
//!   copy the nodes on the path they change (plus each copied node's child
//!   pointer array) and share everything else. The in-place "dirty" path goes
//!   through [`ReferenceCounter::make_mut`], which only writes to nodes it owns
//!   exclusively and copies any node that is still shared.

use std::iter::FusedIterator;

use super::{ARITY, ReferenceCounter};
use crate::hashable::{Hashable, dispatch_equal, dispatch_hash};
use crate::sequence::{self, Sequence};

// =============================================================================
// Node Definition
// =============================================================================

type Child<T> = Option<ReferenceCounter<Node<T>>>;

type Children<T> = Box<[Child<T>; ARITY]>;

fn empty_children<T>() -> Children<T> {
    Box::new(std::array::from_fn(|_| None))
}

/// Internal node of the trie.
#[derive(Clone)]
struct Node<T> {
    /// Value stored at this node. May be absent on an interior node whose
    /// value was deleted.
    value: Option<T>,
    /// Child slots, materialized once a second value needs this node.
    children: Option<Children<T>>,
    /// Number of values in this subtree, including `value`.
    size: u64,
}

/// Where an inserted value goes relative to a node.
enum Placement {
    /// The node's value slot is free and the value is not stored below.
    Occupy,
    /// The node holds an equal value.
    Overwrite,
    /// The value belongs in the child slot for this depth.
    Descend,
}

impl<T> Node<T> {
    const fn leaf(value: T) -> Self {
        Self {
            value: Some(value),
            children: None,
            size: 1,
        }
    }

    fn child(&self, slot: usize) -> Option<&Self> {
        self.children.as_deref().and_then(|children| children[slot].as_deref())
    }
}

/// Walks from `node` along the path given by `hash`, starting at `depth`.
fn find_from<'a, T, H, M>(
    mut current: Option<&'a Node<T>>,
    hash: &H,
    matches: &M,
    mut depth: u32,
) -> Option<&'a T>
where
    H: Fn(u32) -> usize,
    M: Fn(&T) -> bool,
{
    while let Some(node) = current {
        if let Some(value) = &node.value
            && matches(value)
        {
            return Some(value);
        }
        current = node.child(hash(depth));
        depth += 1;
    }
    None
}

impl<T: Clone + Hashable> Node<T> {
    fn placement(&self, value: &T, depth: u32) -> Placement {
        match &self.value {
            Some(existing) if dispatch_equal(existing, value) => Placement::Overwrite,
            Some(_) => Placement::Descend,
            None => {
                let stored_below = find_from(
                    self.child(dispatch_hash(value, depth)),
                    &|seed| dispatch_hash(value, seed),
                    &|candidate: &T| dispatch_equal(candidate, value),
                    depth + 1,
                )
                .is_some();
                if stored_below {
                    Placement::Descend
                } else {
                    Placement::Occupy
                }
            }
        }
    }

    /// Clone-on-path insert. Returns the replacement node and whether the
    /// value was new.
    fn inserted(&self, value: T, depth: u32) -> (Self, bool) {
        match self.placement(&value, depth) {
            Placement::Occupy => {
                let mut cloned = self.clone();
                cloned.value = Some(value);
                cloned.size += 1;
                (cloned, true)
            }
            Placement::Overwrite => {
                let mut cloned = self.clone();
                cloned.value = Some(value);
                (cloned, false)
            }
            Placement::Descend => {
                let slot = dispatch_hash(&value, depth);
                let (child, added) = match self.child(slot) {
                    Some(child) => child.inserted(value, depth + 1),
                    None => (Self::leaf(value), true),
                };
                let mut cloned = self.clone();
                cloned.children.get_or_insert_with(empty_children)[slot] =
                    Some(ReferenceCounter::new(child));
                if added {
                    cloned.size += 1;
                }
                (cloned, added)
            }
        }
    }

    /// In-place insert. Only valid on a node the caller owns exclusively.
    fn insert_in_place(&mut self, value: T, depth: u32) -> bool {
        match self.placement(&value, depth) {
            Placement::Occupy => {
                self.value = Some(value);
                self.size += 1;
                true
            }
            Placement::Overwrite => {
                self.value = Some(value);
                false
            }
            Placement::Descend => {
                let slot = dispatch_hash(&value, depth);
                let children = self.children.get_or_insert_with(empty_children);
                let added = insert_dirty(&mut children[slot], value, depth + 1);
                if added {
                    self.size += 1;
                }
                added
            }
        }
    }

    /// Clone-on-path delete of the first value along `hash` that `matches`.
    ///
    /// Returns `None` when nothing was removed so the caller can keep sharing
    /// this node. `Some(None)` means the node emptied out entirely.
    fn removed_by<H, M>(&self, hash: &H, matches: &M, depth: u32) -> Option<Child<T>>
    where
        H: Fn(u32) -> usize,
        M: Fn(&T) -> bool,
    {
        if self.value.as_ref().is_some_and(matches) {
            if self.size == 1 {
                return Some(None);
            }
            return Some(Some(ReferenceCounter::new(Self {
                value: None,
                children: self.children.clone(),
                size: self.size - 1,
            })));
        }

        let slot = hash(depth);
        let replacement = self.child(slot)?.removed_by(hash, matches, depth + 1)?;
        Some(self.with_child_shrunk(slot, replacement))
    }

    /// Clone-on-path removal of an arbitrary value: children are drained in
    /// ascending slot order before the node's own value.
    fn popped(&self) -> Option<(T, Child<T>)> {
        if let Some(children) = self.children.as_deref() {
            for (slot, child) in children.iter().enumerate() {
                if let Some((value, rest)) = child.as_deref().and_then(Self::popped) {
                    return Some((value, self.with_child_shrunk(slot, rest)));
                }
            }
        }
        // No child yielded anything, so this node holds at most its own value.
        self.value.clone().map(|value| (value, None))
    }

    /// Copy of this node with `slot` replaced by a subtree holding one value
    /// fewer than before.
    fn with_child_shrunk(&self, slot: usize, replacement: Child<T>) -> Child<T> {
        let size = self.size - 1;
        if size == 0 {
            return None;
        }
        let own = u64::from(self.value.is_some());
        let children = if size == own {
            None
        } else {
            let mut children = self.children.clone().unwrap_or_else(empty_children);
            children[slot] = replacement;
            Some(children)
        };
        Some(ReferenceCounter::new(Self {
            value: self.value.clone(),
            children,
            size,
        }))
    }
}

/// In-place insert into a child slot, copying the node first if it is shared.
fn insert_dirty<T: Clone + Hashable>(slot: &mut Child<T>, value: T, depth: u32) -> bool {
    match slot {
        None => {
            *slot = Some(ReferenceCounter::new(Node::leaf(value)));
            true
        }
        Some(node) => ReferenceCounter::make_mut(node).insert_in_place(value, depth),
    }
}

// =============================================================================
// HashTrie Definition
// =============================================================================

/// Handle to the root of a persistent hash trie.
///
/// Cloning a handle is O(1) and shares the whole tree.
pub(crate) struct HashTrie<T> {
    root: Child<T>,
}

impl<T> Clone for HashTrie<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<T> Default for HashTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HashTrie<T> {
    pub(crate) const fn new() -> Self {
        Self { root: None }
    }

    /// Number of values, O(1). An absent root has size 0.
    pub(crate) fn size(&self) -> u64 {
        self.root.as_ref().map_or(0, |root| root.size)
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn iter(&self) -> TrieIterator<'_, T> {
        TrieIterator {
            stack: self.root.as_deref().into_iter().collect(),
            remaining: usize::try_from(self.size()).unwrap_or(usize::MAX),
        }
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        fn depth_of<T>(node: Option<&Node<T>>) -> usize {
            node.map_or(0, |node| {
                1 + node.children.as_deref().map_or(0, |children| {
                    children
                        .iter()
                        .map(|child| depth_of(child.as_deref()))
                        .max()
                        .unwrap_or(0)
                })
            })
        }
        depth_of(self.root.as_deref())
    }

    /// Checks the size and normalization invariants of every node.
    #[cfg(test)]
    pub(crate) fn assert_well_formed(&self) {
        fn check<T>(node: &Node<T>) -> u64 {
            let below: u64 = node.children.as_deref().map_or(0, |children| {
                children.iter().flatten().map(|child| check(child)).sum()
            });
            let total = below + u64::from(node.value.is_some());
            assert_eq!(node.size, total, "stale size");
            assert!(total > 0, "empty node retained");
            total
        }
        if let Some(root) = self.root.as_deref() {
            check(root);
        }
    }
}

impl<T: Clone + Hashable> HashTrie<T> {
    /// Finds the stored value equal to `value`.
    pub(crate) fn lookup(&self, value: &T) -> Option<&T> {
        self.lookup_by(
            |seed| dispatch_hash(value, seed),
            |candidate| dispatch_equal(candidate, value),
        )
    }

    /// Finds the first stored value on the path given by `hash` that
    /// satisfies `matches`. `hash` must agree with the stored values' own
    /// hashes for any value it is meant to find.
    pub(crate) fn lookup_by<H, M>(&self, hash: H, matches: M) -> Option<&T>
    where
        H: Fn(u32) -> usize,
        M: Fn(&T) -> bool,
    {
        find_from(self.root.as_deref(), &hash, &matches, 0)
    }

    /// Returns a trie with `value` added, and whether it was not present
    /// before. An equal stored value is replaced.
    pub(crate) fn insert(&self, value: T) -> (Self, bool) {
        let (root, added) = match self.root.as_deref() {
            Some(root) => root.inserted(value, 0),
            None => (Node::leaf(value), true),
        };
        (
            Self {
                root: Some(ReferenceCounter::new(root)),
            },
            added,
        )
    }

    /// Adds `value` in place. Nodes shared with other handles are copied
    /// before being written.
    pub(crate) fn insert_dirty(&mut self, value: T) -> bool {
        insert_dirty(&mut self.root, value, 0)
    }

    /// Returns a trie without `value`, and whether it was present.
    pub(crate) fn delete(&self, value: &T) -> (Self, bool) {
        self.delete_by(
            |seed| dispatch_hash(value, seed),
            |candidate| dispatch_equal(candidate, value),
        )
    }

    /// Removes the first stored value on the path given by `hash` that
    /// satisfies `matches`.
    pub(crate) fn delete_by<H, M>(&self, hash: H, matches: M) -> (Self, bool)
    where
        H: Fn(u32) -> usize,
        M: Fn(&T) -> bool,
    {
        match self
            .root
            .as_deref()
            .and_then(|root| root.removed_by(&hash, &matches, 0))
        {
            Some(root) => (Self { root }, true),
            None => (self.clone(), false),
        }
    }

    /// Splits off an arbitrary value. On an empty trie this returns
    /// `(None, empty, false)`.
    pub(crate) fn first_rest(&self) -> (Option<T>, Self, bool) {
        match self.root.as_deref().and_then(Node::popped) {
            Some((value, root)) => (Some(value), Self { root }, true),
            None => (None, Self::new(), false),
        }
    }

    // =========================================================================
    // Set algebra
    // =========================================================================

    /// Adds every element of `other`. Elements of `other` replace equal
    /// stored values.
    pub(crate) fn union<S: Sequence<Item = T>>(&self, other: &S) -> Self {
        let mut result = self.clone();
        for element in sequence::iter(other) {
            result.insert_dirty(element);
        }
        result
    }

    /// Elements of `other` that are also stored here.
    pub(crate) fn intersection<S: Sequence<Item = T>>(&self, other: &S) -> Self {
        let mut result = Self::new();
        if self.is_empty() {
            return result;
        }
        for element in sequence::iter(other) {
            if self.lookup(&element).is_some() {
                result.insert_dirty(element);
            }
        }
        result
    }

    /// Removes every element of `other`.
    pub(crate) fn difference<S: Sequence<Item = T>>(&self, other: &S) -> Self {
        let mut result = self.clone();
        for element in sequence::iter(other) {
            if result.is_empty() {
                break;
            }
            result = result.delete(&element).0;
        }
        result
    }

    /// Toggles membership of every element of `other`.
    pub(crate) fn symmetric_difference<S: Sequence<Item = T>>(&self, other: &S) -> Self {
        let mut result = self.clone();
        for element in sequence::iter(other) {
            let (removed, was_present) = result.delete(&element);
            if was_present {
                result = removed;
            } else {
                result.insert_dirty(element);
            }
        }
        result
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// Depth-first iterator over the values of a trie.
pub(crate) struct TrieIterator<'a, T> {
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for TrieIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let Some(children) = node.children.as_deref() {
                self.stack
                    .extend(children.iter().rev().filter_map(|child| child.as_deref()));
            }
            if let Some(value) = &node.value {
                self.remaining = self.remaining.saturating_sub(1);
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for TrieIterator<'_, T> {}

impl<T> FusedIterator for TrieIterator<'_, T> {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn trie_of(values: impl IntoIterator<Item = i64>) -> HashTrie<i64> {
        let mut trie = HashTrie::new();
        for value in values {
            trie.insert_dirty(value);
        }
        trie
    }

    fn sorted(trie: &HashTrie<i64>) -> Vec<i64> {
        let mut values: Vec<i64> = trie.iter().copied().collect();
        values.sort_unstable();
        values
    }

    #[rstest]
    fn test_empty_trie_operations_do_not_fault() {
        let trie: HashTrie<i64> = HashTrie::new();
        assert_eq!(trie.size(), 0);
        assert_eq!(trie.lookup(&1), None);

        let (deleted, removed) = trie.delete(&1);
        assert!(!removed);
        assert!(deleted.is_empty());

        let (first, rest, found) = trie.first_rest();
        assert_eq!(first, None);
        assert!(!found);
        assert!(rest.is_empty());
    }

    #[rstest]
    fn test_first_insert_materializes_root() {
        let (trie, added) = HashTrie::new().insert(7_i64);
        assert!(added);
        assert_eq!(trie.size(), 1);
        assert_eq!(trie.lookup(&7), Some(&7));
        trie.assert_well_formed();
    }

    #[rstest]
    fn test_insert_is_clone_on_path() {
        let original = trie_of(0..40);
        let (updated, added) = original.insert(1000);

        assert!(added);
        assert_eq!(original.size(), 40);
        assert_eq!(updated.size(), 41);
        assert_eq!(original.lookup(&1000), None);
        assert_eq!(updated.lookup(&1000), Some(&1000));
        original.assert_well_formed();
        updated.assert_well_formed();
    }

    #[rstest]
    fn test_insert_shares_untouched_children() {
        let original = trie_of(0..32);
        let (updated, _) = original.insert(100);

        let original_root = original.root.as_deref().unwrap();
        let updated_root = updated.root.as_deref().unwrap();
        let touched = dispatch_hash(&100_i64, 0);
        let untouched = (touched + 1) % ARITY;

        let original_children = original_root.children.as_deref().unwrap();
        let updated_children = updated_root.children.as_deref().unwrap();
        assert!(ReferenceCounter::ptr_eq(
            original_children[untouched].as_ref().unwrap(),
            updated_children[untouched].as_ref().unwrap(),
        ));
    }

    #[rstest]
    fn test_overwrite_reports_not_new() {
        let (trie, _) = HashTrie::new().insert(3_i64);
        let (trie, added) = trie.insert(3);
        assert!(!added);
        assert_eq!(trie.size(), 1);
    }

    #[rstest]
    fn test_deleting_only_value_normalizes_to_absent_root() {
        let (trie, _) = HashTrie::new().insert(3_i64);
        let (deleted, removed) = trie.delete(&3);
        assert!(removed);
        assert!(deleted.is_empty());
        assert_eq!(deleted.size(), 0);
    }

    #[rstest]
    fn test_deleting_root_value_keeps_children() {
        let trie = trie_of([0, 1, 2, 3, 4]);
        let (deleted, removed) = trie.delete(&0);

        assert!(removed);
        assert!(!deleted.is_empty());
        assert_eq!(deleted.size(), 4);
        assert_eq!(deleted.lookup(&0), None);
        assert!(deleted.root.as_deref().unwrap().value.is_none());
        deleted.assert_well_formed();
        assert_eq!(sorted(&trie), vec![0, 1, 2, 3, 4]);
    }

    #[rstest]
    fn test_reinsert_below_cleared_root_does_not_duplicate() {
        let trie = trie_of([0, 1, 2]);
        let (deleted, _) = trie.delete(&0);
        let (reinserted, added) = deleted.insert(1);

        assert!(!added);
        assert_eq!(reinserted.size(), 2);
        assert_eq!(sorted(&reinserted), vec![1, 2]);
        reinserted.assert_well_formed();
    }

    #[rstest]
    fn test_new_value_fills_cleared_root() {
        let trie = trie_of([0, 1, 2, 3, 4]);
        let (deleted, _) = trie.delete(&0);
        let (refilled, added) = deleted.insert(5);

        assert!(added);
        assert_eq!(refilled.root.as_deref().unwrap().value, Some(5));
        assert_eq!(sorted(&refilled), vec![1, 2, 3, 4, 5]);
        refilled.assert_well_formed();
    }

    #[rstest]
    fn test_colliding_values_chain_through_rehash() {
        let values: Vec<i64> = (0..20).map(|index| index * ARITY as i64).collect();
        let trie = trie_of(values.clone());

        assert_eq!(trie.size(), 20);
        for value in &values {
            assert_eq!(trie.lookup(value), Some(value));
        }
        trie.assert_well_formed();
    }

    #[rstest]
    fn test_delete_missing_value_shares_root() {
        let trie = trie_of(0..10);
        let (same, removed) = trie.delete(&99);
        assert!(!removed);
        assert!(ReferenceCounter::ptr_eq(
            trie.root.as_ref().unwrap(),
            same.root.as_ref().unwrap()
        ));
    }

    #[rstest]
    fn test_delete_deep_value_prunes_emptied_leaf() {
        let trie = trie_of([0, 32]);
        let (deleted, removed) = trie.delete(&32);
        assert!(removed);
        assert_eq!(deleted.size(), 1);
        assert!(deleted.root.as_deref().unwrap().children.is_none());
        deleted.assert_well_formed();
    }

    #[rstest]
    fn test_first_rest_drains_every_value_once() {
        let original = trie_of(0..100);
        let mut current = original.clone();
        let mut drained = Vec::new();

        loop {
            let (first, rest, found) = current.first_rest();
            if !found {
                assert!(rest.is_empty());
                break;
            }
            drained.push(first.unwrap());
            rest.assert_well_formed();
            assert_eq!(rest.size(), current.size() - 1);
            current = rest;
        }

        drained.sort_unstable();
        assert_eq!(drained, (0..100).collect::<Vec<_>>());
        assert_eq!(original.size(), 100);
    }

    #[rstest]
    fn test_first_rest_on_exhausted_trie_is_idempotent() {
        let empty: HashTrie<i64> = HashTrie::new();
        for _ in 0..3 {
            let (first, rest, found) = empty.first_rest();
            assert_eq!((first, found), (None, false));
            assert!(rest.is_empty());
        }
    }

    #[rstest]
    fn test_insert_dirty_copies_shared_nodes() {
        let original = trie_of(0..50);
        let mut copy = original.clone();
        copy.insert_dirty(500);

        assert_eq!(original.size(), 50);
        assert_eq!(original.lookup(&500), None);
        assert_eq!(copy.size(), 51);
        original.assert_well_formed();
        copy.assert_well_formed();
    }

    #[rstest]
    fn test_lookup_by_uses_custom_query() {
        let trie = trie_of([10, 20, 30]);
        let found = trie.lookup_by(|seed| dispatch_hash(&20_i64, seed), |value| *value == 20);
        assert_eq!(found, Some(&20));
    }

    #[rstest]
    fn test_iterator_reports_exact_size() {
        let trie = trie_of(0..77);
        let iterator = trie.iter();
        assert_eq!(iterator.len(), 77);
        assert_eq!(iterator.count(), 77);
    }

    #[rstest]
    fn test_depth_stays_shallow_for_dense_integers() {
        let trie = trie_of(0..1024);
        assert!(trie.depth() <= 6, "depth {}", trie.depth());
    }
}
