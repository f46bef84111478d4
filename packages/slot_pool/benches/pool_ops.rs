//! Basic benchmarks for the `slot_pool` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use slot_pool::SlotPool;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_ops");

    group.bench_function("add_remove_cycle", |b| {
        let pool = SlotPool::new();

        b.iter(|| {
            let id = pool.add(black_box(1_u64));
            pool.remove(black_box(id));
        });
    });

    group.bench_function("get_pinned", |b| {
        let pool = SlotPool::new();
        let id = pool.add(1_u64);

        b.iter(|| {
            let accessor = pool.get(black_box(id)).unwrap();
            black_box(*accessor);
        });

        pool.remove(id);
    });

    group.bench_function("add_get_remove_cycle", |b| {
        let pool = SlotPool::new();

        b.iter(|| {
            let id = pool.add(black_box(1_u64));
            let accessor = pool.get(id).unwrap();
            pool.remove(id);
            black_box(accessor);
        });
    });

    group.finish();
}
