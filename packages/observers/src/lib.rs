#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Weak-reference publish/subscribe.
//!
//! A [`Subject`] holds an ordered list of weak references to [`Observer`]s.
//! [`Subject::notify()`] delivers to every observer that is still alive, in
//! subscription order, on the calling thread; observers that have been
//! dropped are pruned from the list during the same pass.
//!
//! The subject never owns its observers. The one strong reference is the
//! `Arc` that [`Observer::new()`] (or [`Subject::subscribe_fn()`]) returns,
//! and its lifetime belongs to the caller - who must call
//! [`Observer::unsubscribe()`] before dropping anything the callback
//! captures.
//!
//! # Example
//!
//! ```
//! use std::sync::Mutex;
//! use std::sync::Arc;
//!
//! use observers::Subject;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let subject = Subject::new();
//!
//! let sink = Arc::clone(&seen);
//! let observer = subject.subscribe_fn(move |value: &i32| {
//!     sink.lock().unwrap().push(*value);
//! });
//!
//! subject.notify(&1);
//! subject.notify(&2);
//!
//! assert_eq!(*seen.lock().unwrap(), [1, 2]);
//!
//! observer.unsubscribe();
//! ```

mod observer;
mod subject;

pub use observer::*;
pub use subject::*;
