//! # Conflict Detection Benchmarks
//!
//! Performance benchmarks for relchron-core consistency queries.
//!
//! Run with: `cargo bench -p relchron-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use relchron_core::{Collection, EventBuilder, MarkerId, TimeMarker};
use std::hint::black_box;

/// A linear chain of N events, each strictly before the next.
fn create_chain(size: usize) -> Collection {
    let ids: Vec<MarkerId> = (0..size).map(|_| MarkerId::random()).collect();
    let markers: Vec<TimeMarker> = (0..size)
        .map(|i| {
            let mut builder = EventBuilder::new(format!("event-{i}")).id(ids[i]);
            if i + 1 < size {
                builder = builder.before(ids[i + 1]);
            }
            builder.build().expect("build")
        })
        .collect();
    Collection::from_markers(markers).expect("collection")
}

/// A chain of N events broken by one back-edge, forming one long cycle.
fn create_cyclic_chain(size: usize) -> Collection {
    let ids: Vec<MarkerId> = (0..size).map(|_| MarkerId::random()).collect();
    let markers: Vec<TimeMarker> = (0..size)
        .map(|i| {
            let mut builder = EventBuilder::new(format!("event-{i}")).id(ids[i]);
            builder = builder.before(ids[(i + 1) % size]);
            builder.build().expect("build")
        })
        .collect();
    Collection::from_markers(markers).expect("collection")
}

/// Chains of same-time assertions stressing the union-find.
fn create_same_chain(size: usize) -> Collection {
    let ids: Vec<MarkerId> = (0..size).map(|_| MarkerId::random()).collect();
    let markers: Vec<TimeMarker> = (0..size)
        .map(|i| {
            let mut builder = EventBuilder::new(format!("event-{i}")).id(ids[i]);
            if i > 0 {
                builder = builder.same(ids[i - 1]);
            }
            builder.build().expect("build")
        })
        .collect();
    Collection::from_markers(markers).expect("collection")
}

fn bench_acyclic_conflicts(c: &mut Criterion) {
    let mut group = c.benchmark_group("conflicts_acyclic_chain");
    for size in [100, 1000] {
        let collection = create_chain(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &collection, |b, col| {
            b.iter(|| black_box(col.conflicts()));
        });
    }
    group.finish();
}

fn bench_cyclic_conflicts(c: &mut Criterion) {
    let mut group = c.benchmark_group("conflicts_one_long_cycle");
    for size in [100, 1000] {
        let collection = create_cyclic_chain(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &collection, |b, col| {
            b.iter(|| black_box(col.conflicts()));
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_same_chain");
    for size in [100, 1000] {
        let collection = create_same_chain(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &collection, |b, col| {
            b.iter(|| black_box(relchron_core::Representatives::compute(col)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_acyclic_conflicts,
    bench_cyclic_conflicts,
    bench_merge
);
criterion_main!(benches);
