use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use crate::ElementId;
use crate::pool::PoolInner;

/// A pinning, reference-counted handle to an element in a
/// [`SlotPool`][crate::SlotPool].
///
/// While at least one accessor for an id exists, the pool will not recycle
/// that slot: removing the id only marks it as garbage, and the actual
/// Garbage→Free transition happens automatically when the last accessor is
/// dropped. Cloning an accessor is cheap and yields another handle to the
/// same storage.
///
/// Accessors dereference to a shared `&T`. Elements that need in-place
/// mutation through their accessors should carry their own interior
/// synchronization (e.g. a `T` containing a `Mutex`), which keeps aliasing
/// sound without the pool serializing element access.
///
/// # Example
///
/// ```
/// use slot_pool::SlotPool;
///
/// let pool = SlotPool::new();
/// let id = pool.add(7_u32);
///
/// let first = pool.get(id).unwrap();
/// let second = first.clone();
///
/// assert_eq!(*first, 7);
/// assert_eq!(*second, 7);
/// # pool.remove(id);
/// ```
pub struct Accessor<T> {
    core: Arc<AccessorCore<T>>,
}

/// The shared pinning record behind every clone of one accessor.
///
/// Dropping the last clone drops this, which reports the release to the
/// pool so a garbage slot can complete its transition to free.
pub(crate) struct AccessorCore<T> {
    id: ElementId,

    /// Shares the element storage with the pool's slot, so the value stays
    /// alive here even after the pool clears the slot.
    value: Arc<T>,

    /// Weak so that accessors never keep a dropped pool alive; if the pool
    /// is gone there is nothing left to release into.
    pool: Weak<PoolInner<T>>,
}

impl<T> AccessorCore<T> {
    pub(crate) fn new(id: ElementId, value: Arc<T>, pool: Weak<PoolInner<T>>) -> Self {
        Self { id, value, pool }
    }
}

impl<T> Accessor<T> {
    pub(crate) fn new(core: Arc<AccessorCore<T>>) -> Self {
        Self { core }
    }

    /// The id of the element this accessor pins.
    ///
    /// Note that once [`remove()`][crate::SlotPool::remove] has been called
    /// for the id, the pool no longer resolves it even though this accessor
    /// still reads the storage.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.core.id
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T> Deref for Accessor<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.core.value
    }
}

impl<T> Drop for AccessorCore<T> {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.upgrade() {
            pool.release(self.id);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("id", &self.core.id)
            .field("value", &*self.core.value)
            .finish()
    }
}
