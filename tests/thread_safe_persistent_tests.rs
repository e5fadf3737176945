//! Integration tests for sharing persistent structures across threads.
//!
//! With the `arc` feature enabled, handles and the nodes they share can be
//! read and derived from on any thread. Writers deriving from the same handle
//! each get an independent version.

#![cfg(feature = "arc")]

use rstest::rstest;
use std::thread;
use trieseq::persistent::{HashMap, List, Set};

// =============================================================================
// Set
// =============================================================================

#[rstest]
fn test_set_concurrent_writers_get_independent_versions() {
    let original = Set::from_values(0_i64..100);

    let handles: Vec<_> = (0..4_i64)
        .map(|index| {
            let shared = original.clone();
            thread::spawn(move || {
                let (extended, added) = shared.insert(1_000 + index);
                assert!(added);
                assert_eq!(shared.len(), 100);
                extended
            })
        })
        .collect();

    let results: Vec<Set<i64>> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    for (index, set) in (0_i64..).zip(&results) {
        assert_eq!(set.len(), 101);
        assert!(set.contains(&(1_000 + index)));
        for other in (0_i64..4).filter(|other| *other != index) {
            assert!(!set.contains(&(1_000 + other)));
        }
    }
    assert_eq!(original.len(), 100);
}

#[rstest]
fn test_set_concurrent_readers() {
    let set = Set::from_values((0_i64..1_000).map(|n| n * 7));

    let handles: Vec<_> = (0..8_i64)
        .map(|offset| {
            let shared = set.clone();
            thread::spawn(move || (0..1_000).filter(|n| shared.contains(&(n * 7 + offset))).count())
        })
        .collect();

    for (offset, handle) in handles.into_iter().enumerate() {
        let found = handle.join().expect("Thread panicked");
        let expected = match offset {
            0 => 1_000,
            7 => 999,
            _ => 0,
        };
        assert_eq!(found, expected, "offset {offset}");
    }
}

// =============================================================================
// HashMap
// =============================================================================

#[rstest]
fn test_map_shared_across_threads() {
    let map = HashMap::from_entries((0..50).map(|key| (key, key.to_string())));

    let handles: Vec<_> = (0..4)
        .map(|thread_index| {
            let shared = map.clone();
            thread::spawn(move || {
                let (updated, added) = shared.insert(0, format!("thread {thread_index}"));
                assert!(!added);
                assert_eq!(shared.get(&0).map(String::as_str), Some("0"));
                updated
            })
        })
        .collect();

    for (thread_index, handle) in handles.into_iter().enumerate() {
        let updated = handle.join().expect("Thread panicked");
        assert_eq!(updated.get(&0), Some(&format!("thread {thread_index}")));
    }
    assert_eq!(map.get(&0).map(String::as_str), Some("0"));
}

// =============================================================================
// List
// =============================================================================

#[rstest]
fn test_list_cross_thread_structural_sharing() {
    let original = List::from_values([1, 2, 3]);

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let shared = original.clone();
            thread::spawn(move || {
                let extended = shared.prepend(index * 10);
                assert_eq!(extended.len(), 4);
                assert_eq!(shared.len(), 3);
                extended
            })
        })
        .collect();

    for (index, handle) in (0..).zip(handles) {
        let list = handle.join().expect("Thread panicked");
        assert_eq!(list.head(), Some(&(index * 10)));
        assert_eq!(list.tail(), original);
    }
}
