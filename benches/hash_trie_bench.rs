//! Benchmark for the hash trie behind Set and HashMap.
//!
//! Compares persistent (clone-on-path) updates with bulk construction and
//! with the standard library's `HashSet`.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::HashSet;
use std::hint::black_box;
use trieseq::persistent::{HashMap, Set};

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in [1_000_i64, 10_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("Set::insert", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut set = Set::new();
                    for index in 0..size {
                        set = set.insert(black_box(index)).0;
                    }
                    black_box(set)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("Set::from_values", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| black_box(Set::from_values((0..size).map(black_box))));
            },
        );

        group.bench_with_input(BenchmarkId::new("HashSet", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut set = HashSet::new();
                for index in 0..size {
                    set.insert(black_box(index));
                }
                black_box(set)
            });
        });
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in [1_000_i64, 10_000, 100_000] {
        let set = Set::from_values(0..size);
        let map = HashMap::from_entries((0..size).map(|key| (key, key * 2)));

        group.bench_with_input(BenchmarkId::new("Set::contains", size), &size, |bencher, &size| {
            bencher.iter(|| {
                for index in 0..size {
                    black_box(set.contains(black_box(&index)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("HashMap::get", size), &size, |bencher, &size| {
            bencher.iter(|| {
                for index in 0..size {
                    black_box(map.get(black_box(&index)));
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove");

    for size in [1_000_i64, 10_000] {
        let set = Set::from_values(0..size);

        group.bench_with_input(BenchmarkId::new("Set::remove", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut current = set.clone();
                for index in 0..size {
                    current = current.remove(black_box(&index)).0;
                }
                black_box(current)
            });
        });
    }

    group.finish();
}

// =============================================================================
// set algebra Benchmark
// =============================================================================

fn benchmark_algebra(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("algebra");

    for size in [1_000_i64, 10_000] {
        let left = Set::from_values(0..size);
        let right = Set::from_values(size / 2..size + size / 2);

        group.bench_with_input(BenchmarkId::new("union", size), &size, |bencher, _| {
            bencher.iter(|| black_box(left.union(black_box(&right))));
        });

        group.bench_with_input(BenchmarkId::new("intersection", size), &size, |bencher, _| {
            bencher.iter(|| black_box(left.intersection(black_box(&right))));
        });

        group.bench_with_input(
            BenchmarkId::new("symmetric_difference", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box(left.symmetric_difference(black_box(&right))));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_remove,
    benchmark_algebra
);
criterion_main!(benches);
