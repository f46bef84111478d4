#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A background-thread job runner.
//!
//! [`Worker`] owns a [`BoundedQueue`][bounded_queue::BoundedQueue] of
//! pending jobs and, once started, a single background thread that drains
//! the queue in FIFO order, invoking a caller-supplied handler per job.
//! Producers on any thread enqueue with [`Worker::add_job()`]; a full queue
//! is a recoverable error so producers can apply backpressure.
//!
//! The queue can also be drained synchronously on the calling thread with
//! [`Worker::flush()`], which is what the drop implementation does after
//! stopping the background thread - no accepted job is lost on teardown.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! use job_worker::Worker;
//!
//! let total = Arc::new(AtomicU32::new(0));
//! let handler_total = Arc::clone(&total);
//!
//! let worker = Worker::new(move |job: u32| {
//!     handler_total.fetch_add(job, Ordering::Relaxed);
//! });
//!
//! worker.add_job(1).unwrap();
//! worker.add_job(2).unwrap();
//! worker.flush();
//!
//! assert_eq!(total.load(Ordering::Relaxed), 3);
//! ```

mod builder;
mod constants;
mod worker;

pub use builder::*;
pub use worker::*;

// The queue error type is part of our `add_job` signature.
pub use bounded_queue::CapacityError;
