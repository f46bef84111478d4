#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A hash map behind a reader-writer lock.
//!
//! [`SyncMap`] is a thread-safe keyed lookup table: every read operation
//! takes the shared lock, every mutation takes the exclusive lock. That
//! includes the insert-on-miss accessors ([`SyncMap::get_or_default()`],
//! [`SyncMap::get_or_insert_with()`]), which are writes and are locked as
//! writes.
//!
//! Values are returned by clone, or borrowed inside a closure via
//! [`SyncMap::read()`] and [`SyncMap::modify()`] when cloning is undesirable
//! or a check-then-mutate step must be atomic. [`SyncMap::update()`] exposes
//! the underlying map entry under the exclusive lock for callers that need
//! full occupied/vacant control in one critical section.
//!
//! # Example
//!
//! ```
//! use sync_map::SyncMap;
//!
//! let map = SyncMap::new();
//!
//! map.insert("a", 1);
//! map.insert("b", 2);
//!
//! assert_eq!(map.get(&"a"), Some(1));
//! assert_eq!(map.len(), 2);
//!
//! // Closure access borrows the value under the shared lock.
//! let doubled = map.read(&"b", |value| value * 2).unwrap();
//! assert_eq!(doubled, 4);
//! ```

mod constants;
mod error;
mod map;

pub(crate) use constants::*;
pub use error::*;
pub use map::*;
