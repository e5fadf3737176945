//! Integration tests for the generic sequence algorithms.

use std::ops::ControlFlow;

use rstest::rstest;
use trieseq::persistent::{HashMap, List, Set};
use trieseq::sequence::{self, Sequence};
use trieseq::value::Value;
use trieseq::{hash_map, list, set};

fn increment(n: i32) -> i32 {
    n + 1
}

fn is_even(n: &i32) -> bool {
    n % 2 == 0
}

// =============================================================================
// Map / filter composition
// =============================================================================

#[rstest]
fn test_map_and_filter_do_not_commute() {
    let list: List<i32> = (0..10).collect();

    let filtered_after = sequence::filter(&sequence::map(&list, increment), is_even);
    let mapped_after = sequence::map(&sequence::filter(&list, is_even), increment);

    assert_eq!(filtered_after, list![2, 4, 6, 8, 10]);
    assert_eq!(mapped_after, list![1, 3, 5, 7, 9]);
    assert_eq!(list.len(), 10);
}

#[rstest]
fn test_algorithms_over_sets_produce_lists() {
    let set = set![1, 2, 3, 4];
    let mut doubled = sequence::to_vec(&sequence::map(&set, |n| n * 2));
    doubled.sort_unstable();
    assert_eq!(doubled, vec![2, 4, 6, 8]);
}

// =============================================================================
// Reduce / any / all
// =============================================================================

#[rstest]
fn test_reduce_sums_map_values() {
    let map: HashMap<&str, i32> = hash_map! { "a" => 1, "b" => 2, "c" => 3 };
    let total = sequence::reduce(&map, 0, |sum, entry| ControlFlow::Continue(sum + entry.value));
    assert_eq!(total, 6);
}

#[rstest]
fn test_reduce_break_stops_early() {
    let list: List<i32> = (1..=100).collect();
    let first_over_ten = sequence::reduce(&list, 0, |_, n| {
        if n > 10 {
            ControlFlow::Break(n)
        } else {
            ControlFlow::Continue(0)
        }
    });
    assert_eq!(first_over_ten, 11);
}

#[rstest]
#[case(list![1, 3, 4, 5], Some(4))]
#[case(list![1, 3, 5], None)]
fn test_any_returns_first_match(#[case] list: List<i32>, #[case] expected: Option<i32>) {
    assert_eq!(sequence::any(&list, is_even), expected);
}

#[rstest]
fn test_all_is_vacuously_true() {
    assert!(sequence::all(&List::<i32>::new(), is_even));
    assert!(sequence::all(&set![2, 4], is_even));
    assert!(!sequence::all(&set![2, 3], is_even));
}

// =============================================================================
// Flatten / concat
// =============================================================================

#[rstest]
fn test_flatten_splices_one_level() {
    let nested = list![
        Value::from(0),
        Value::from(list![Value::from(1), Value::from(list![Value::from(2)])]),
        Value::from(3)
    ];
    let flat = sequence::flatten(&nested);
    assert_eq!(flat.len(), 4);
    assert_eq!(flat.to_string(), "( 0 1 ( 2 ) 3 )");
}

#[rstest]
fn test_concat() {
    let nested = list![list![1, 2], List::new(), list![3]];
    assert_eq!(sequence::concat(&nested), list![1, 2, 3]);
}

// =============================================================================
// Take / drop
// =============================================================================

#[rstest]
fn test_take_and_drop_split_a_list() {
    let list: List<i32> = (0..10).collect();
    let head = sequence::take(&list, 4);
    let rest = sequence::drop_first(list.clone(), 4);
    assert_eq!(head, list![0, 1, 2, 3]);
    assert_eq!(rest, list![4, 5, 6, 7, 8, 9]);
}

#[rstest]
fn test_take_while_and_drop_while_split_at_first_failure() {
    let list = list![1, 2, 5, 1, 2];
    assert_eq!(sequence::take_while(&list, |n| *n < 3), list![1, 2]);
    assert_eq!(sequence::drop_while(list, |n| *n < 3), list![5, 1, 2]);
}

#[rstest]
fn test_drop_keeps_structure_kind() {
    let set: Set<i32> = (0..8).collect();
    let rest: Set<i32> = sequence::drop_first(set, 3);
    assert_eq!(rest.size(), 5);

    let drained: Set<i32> = sequence::drop_first(rest, 100);
    assert!(drained.is_empty());
}

// =============================================================================
// Reverse / conversions / rendering
// =============================================================================

#[rstest]
fn test_reverse_and_to_list() {
    let list = list![1, 2, 3];
    assert_eq!(sequence::reverse(&list), list![3, 2, 1]);
    assert_eq!(sequence::to_list(&list), list);
}

#[rstest]
fn test_render_with_custom_delimiters() {
    assert_eq!(sequence::render(&list![1, 2], "<", ">"), "< 1 2 >");
    assert_eq!(sequence::render(&List::<i32>::new(), "<", ">"), "< >");
}

#[rstest]
fn test_size_of_each_structure() {
    assert_eq!(sequence::size(&list![1, 2, 3]), 3);
    assert_eq!(sequence::size(&set![1, 2, 3, 3]), 3);
    assert_eq!(sequence::size(&hash_map! { 1 => 1 }), 1);
}
