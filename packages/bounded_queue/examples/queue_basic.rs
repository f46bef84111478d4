//! Basic usage of `BoundedQueue`: filling, backpressure, draining.

use bounded_queue::BoundedQueue;
use new_zealand::nz;

fn main() {
    let mut queue = BoundedQueue::with_capacity(nz!(4));

    for i in 0..4 {
        queue.push(i).unwrap();
    }

    println!("queue holds {} of {} values", queue.len(), queue.capacity());

    // The fifth push is refused and hands the value back.
    if let Err(error) = queue.push(4) {
        println!("push rejected: {error}; got back {}", error.value());
    }

    while let Some(value) = queue.pop() {
        println!("popped {value}");
    }

    println!("queue drained, len = {}", queue.len());
}
