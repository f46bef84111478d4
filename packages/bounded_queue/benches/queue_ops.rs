//! Basic benchmarks for the `bounded_queue` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use bounded_queue::BoundedQueue;
use criterion::{Criterion, criterion_group, criterion_main};
use new_zealand::nz;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_ops");

    group.bench_function("push_pop_cycle", |b| {
        let mut queue = BoundedQueue::with_capacity(nz!(64));

        b.iter(|| {
            queue.push(black_box(1_u64)).unwrap();
            black_box(queue.pop());
        });
    });

    group.bench_function("fill_and_drain_64", |b| {
        let mut queue = BoundedQueue::with_capacity(nz!(64));

        b.iter(|| {
            for i in 0..64_u64 {
                queue.push(black_box(i)).unwrap();
            }
            while let Some(value) = queue.pop() {
                black_box(value);
            }
        });
    });

    group.finish();
}
