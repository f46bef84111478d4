#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A fixed-capacity ring buffer queue.
//!
//! [`BoundedQueue`] allocates its backing storage once, up front, and never
//! reallocates. Pushing into a full queue is a recoverable error that hands
//! the rejected value back to the caller, so producers can apply
//! backpressure instead of losing data.
//!
//! The queue is a single-owner data structure: mutating operations take
//! `&mut self`. To share it between threads, wrap it in a lock and pair it
//! with a condition variable, which is exactly what the `job_worker` package
//! does to run a background consumer.
//!
//! # Example
//!
//! ```
//! use bounded_queue::BoundedQueue;
//! use new_zealand::nz;
//!
//! let mut queue = BoundedQueue::with_capacity(nz!(2));
//!
//! queue.push("a").unwrap();
//! queue.push("b").unwrap();
//!
//! // The queue is full now; the rejected value comes back to us.
//! let error = queue.push("c").unwrap_err();
//! assert_eq!(error.into_value(), "c");
//!
//! assert_eq!(queue.pop(), Some("a"));
//! assert_eq!(queue.pop(), Some("b"));
//! assert_eq!(queue.pop(), None);
//! ```

mod error;
mod queue;

pub use error::*;
pub use queue::*;
