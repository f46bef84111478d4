#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A slot-recycling object pool with pinning accessors.
//!
//! [`SlotPool`] stores elements in integer-addressed slots and hands out
//! stable [`ElementId`] handles. Freed slots are recycled lowest-id-first,
//! and reclamation is deferred: while any [`Accessor`] pins a slot, removing
//! its id only marks the slot as garbage - the storage survives until the
//! last accessor is dropped, at which point the slot automatically becomes
//! reusable. A live accessor therefore can never observe storage that has
//! been handed to a different logical element.
//!
//! [`SlotPool::get()`] is the one atomic lookup-and-pin operation; there is
//! no way for a removal on another thread to slip between the liveness check
//! and the pinning. [`SlotPool::contains()`] exists for diagnostics but is
//! advisory only.
//!
//! # Example
//!
//! ```
//! use slot_pool::SlotPool;
//!
//! let pool = SlotPool::new();
//!
//! let id = pool.add("hello".to_owned());
//! let accessor = pool.get(id).unwrap();
//!
//! pool.remove(id);
//!
//! // The id is logically gone...
//! assert!(pool.get(id).is_none());
//! // ...but the pinned storage is still readable through the accessor.
//! assert_eq!(&*accessor, "hello");
//!
//! // Once the accessor drops, the slot is recycled.
//! drop(accessor);
//! assert_eq!(pool.add("replacement".to_owned()), id);
//! ```

mod accessor;
mod constants;
mod element_id;
mod pool;

pub use accessor::*;
pub use element_id::*;
pub use pool::*;
