use std::collections::BTreeSet;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use foldhash::{HashSet, HashSetExt};
use sync_map::SyncMap;

use crate::accessor::AccessorCore;
use crate::constants::ERR_POISONED_LOCK;
use crate::{Accessor, ElementId};

/// A thread-safe object pool with stable integer handles and deferred slot
/// reclamation.
///
/// Elements added with [`add()`][Self::add] receive an [`ElementId`] that
/// stays valid until the element is removed. Freed ids are recycled
/// lowest-first; backing storage grows amortized (doubling) when no freed
/// id is available.
///
/// Each slot is in one of three states:
///
/// * **Allocated** - live; [`get()`][Self::get] resolves it.
/// * **Free** - reusable by the next [`add()`][Self::add].
/// * **Garbage** - removed while an [`Accessor`] pinned it; unresolvable,
///   but the storage is preserved until the last accessor drops, at which
///   point the slot automatically becomes Free.
///
/// The Garbage state is what makes id reuse safe: an accessor can never
/// observe storage that has been handed to a different logical element,
/// because a pinned slot is never recycled.
///
/// The pool is a cloneable handle; clones share the same slots and can be
/// used freely from multiple threads.
///
/// # `get` versus `contains`
///
/// [`get()`][Self::get] validates the id and pins the slot in one critical
/// section, which is the only race-free way to access an element that
/// another thread may concurrently remove. [`contains()`][Self::contains]
/// answers the state question on its own and is advisory: by the time the
/// caller acts on the answer, it may be stale.
///
/// # Example
///
/// ```
/// use slot_pool::SlotPool;
///
/// let pool = SlotPool::new();
///
/// let id0 = pool.add(10);
/// let id1 = pool.add(20);
/// assert_eq!(pool.len(), 2);
///
/// pool.remove(id0);
///
/// // The lowest freed id is reused first.
/// assert_eq!(pool.add(30), id0);
/// # pool.remove(id0);
/// # pool.remove(id1);
/// ```
pub struct SlotPool<T> {
    inner: Arc<PoolInner<T>>,
}

/// Shared pool state.
///
/// Lock order, for every code path that holds more than one: garbage list,
/// then free list, then slot storage, then the accessor map. `get` holds
/// the garbage and free locks across validate-and-pin so no removal can
/// interleave; `release` (accessor drop) takes the same locks in the same
/// order, so the two cannot deadlock.
pub(crate) struct PoolInner<T> {
    garbage: Mutex<HashSet<usize>>,

    /// Ordered so that the lowest freed id is recycled first.
    free: Mutex<BTreeSet<usize>>,

    /// `Some` for Allocated and Garbage slots, `None` for Free ones.
    slots: Mutex<Vec<Option<Arc<T>>>>,

    /// One weak entry per allocated id that currently has (or recently had)
    /// accessors. Dead entries are replaced lazily by the next `get` and
    /// removed on state transitions.
    accessors: SyncMap<ElementId, Weak<AccessorCore<T>>>,
}

impl<T> SlotPool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty pool with backing storage reserved for `capacity`
    /// elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                garbage: Mutex::new(HashSet::new()),
                free: Mutex::new(BTreeSet::new()),
                slots: Mutex::new(Vec::with_capacity(capacity)),
                accessors: SyncMap::new(),
            }),
        }
    }

    /// Adds an element and returns its id.
    ///
    /// The lowest freed id is reused if one exists; otherwise the backing
    /// storage grows and a fresh id is assigned.
    pub fn add(&self, value: T) -> ElementId {
        let mut free = self.inner.free.lock().expect(ERR_POISONED_LOCK);
        let mut slots = self.inner.slots.lock().expect(ERR_POISONED_LOCK);

        if let Some(index) = free.pop_first() {
            *slots
                .get_mut(index)
                .expect("freed ids always point into the backing storage") =
                Some(Arc::new(value));
            ElementId::new(index)
        } else {
            slots.push(Some(Arc::new(value)));
            ElementId::new(
                slots
                    .len()
                    .checked_sub(1)
                    .expect("storage is non-empty right after a push"),
            )
        }
    }

    /// Resolves an id to a pinning [`Accessor`], or [`None`] if the id is
    /// not currently allocated (out of range, free, or garbage).
    ///
    /// Validation and pinning happen in one critical section, so a
    /// concurrent [`remove()`][Self::remove] either happens-before this call
    /// (and the result is [`None`]) or happens-after (and the slot goes to
    /// garbage, pinned by the returned accessor). All accessors obtained for
    /// the same id alias the same storage.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<Accessor<T>> {
        let garbage = self.inner.garbage.lock().expect(ERR_POISONED_LOCK);
        let free = self.inner.free.lock().expect(ERR_POISONED_LOCK);

        let value = {
            let slots = self.inner.slots.lock().expect(ERR_POISONED_LOCK);

            if garbage.contains(&id.index()) || free.contains(&id.index()) {
                return None;
            }

            let slot = slots.get(id.index())?;
            Arc::clone(
                slot.as_ref()
                    .expect("a slot that is neither free nor garbage holds a value"),
            )
        };

        // Still holding the garbage and free locks: no state transition for
        // this id can interleave with the pin bookkeeping below.
        let core = self.inner.accessors.update(id, |entry| match entry {
            Entry::Occupied(mut entry) => entry.get().upgrade().unwrap_or_else(|| {
                let core = Arc::new(AccessorCore::new(
                    id,
                    Arc::clone(&value),
                    Arc::downgrade(&self.inner),
                ));
                entry.insert(Arc::downgrade(&core));
                core
            }),
            Entry::Vacant(entry) => {
                let core = Arc::new(AccessorCore::new(
                    id,
                    Arc::clone(&value),
                    Arc::downgrade(&self.inner),
                ));
                entry.insert(Arc::downgrade(&core));
                core
            }
        });

        drop(free);
        drop(garbage);

        Some(Accessor::new(core))
    }

    /// Removes an element by id. Idempotent.
    ///
    /// If no accessor pins the id, the slot becomes Free immediately and is
    /// eligible for reuse by [`add()`][Self::add]. If accessors pin it, the
    /// slot becomes Garbage: unresolvable, but preserved until the last
    /// accessor drops. Removing an id that is already Free or Garbage has no
    /// effect.
    pub fn remove(&self, id: ElementId) {
        let mut garbage = self.inner.garbage.lock().expect(ERR_POISONED_LOCK);
        let mut free = self.inner.free.lock().expect(ERR_POISONED_LOCK);
        let mut slots = self.inner.slots.lock().expect(ERR_POISONED_LOCK);

        let index = id.index();

        if index >= slots.len() || garbage.contains(&index) || free.contains(&index) {
            return;
        }

        let pinned = self
            .inner
            .accessors
            .read(&id, |weak| weak.strong_count() > 0)
            .unwrap_or(false);

        self.inner.accessors.remove(&id);

        if pinned {
            garbage.insert(index);
        } else {
            *slots
                .get_mut(index)
                .expect("index was bounds-checked above") = None;
            free.insert(index);
        }
    }

    /// Whether `id` is currently allocated.
    ///
    /// Advisory only: the answer can be stale by the time the caller acts on
    /// it. Use [`get()`][Self::get] for race-free access.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        let garbage = self.inner.garbage.lock().expect(ERR_POISONED_LOCK);
        let free = self.inner.free.lock().expect(ERR_POISONED_LOCK);
        let slots = self.inner.slots.lock().expect(ERR_POISONED_LOCK);

        id.index() < slots.len()
            && !garbage.contains(&id.index())
            && !free.contains(&id.index())
    }

    /// The number of allocated elements.
    ///
    /// Free and garbage slots do not count, so removing a pinned element
    /// decreases the length immediately even though its storage lives on.
    #[must_use]
    pub fn len(&self) -> usize {
        let garbage = self.inner.garbage.lock().expect(ERR_POISONED_LOCK);
        let free = self.inner.free.lock().expect(ERR_POISONED_LOCK);
        let slots = self.inner.slots.lock().expect(ERR_POISONED_LOCK);

        slots
            .len()
            .checked_sub(free.len())
            .and_then(|n| n.checked_sub(garbage.len()))
            .expect("free and garbage ids are disjoint subsets of the storage")
    }

    /// Whether the pool holds no allocated elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of elements the backing storage can hold without growing.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.slots.lock().expect(ERR_POISONED_LOCK).capacity()
    }
}

impl<T> PoolInner<T> {
    /// Called by the last accessor of an id when it drops: completes the
    /// Garbage→Free transition, if one is pending.
    ///
    /// Releasing an id that was never removed (accessor dropped while the
    /// element is still allocated) is a no-op.
    pub(crate) fn release(&self, id: ElementId) {
        let mut garbage = self.garbage.lock().expect(ERR_POISONED_LOCK);

        if garbage.remove(&id.index()) {
            let mut free = self.free.lock().expect(ERR_POISONED_LOCK);
            let mut slots = self.slots.lock().expect(ERR_POISONED_LOCK);

            *slots
                .get_mut(id.index())
                .expect("garbage ids always point into the backing storage") = None;
            free.insert(id.index());
        }
    }
}

impl<T> Clone for SlotPool<T> {
    /// Returns another handle to the same pool.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for SlotPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SlotPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotPool")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

/// Type-erased view of a [`SlotPool`], for callers that track pools of mixed
/// element types behind one interface (e.g. a maintenance sweep that only
/// needs occupancy numbers and removal).
pub trait ErasedPool {
    /// The number of allocated elements.
    fn len(&self) -> usize;

    /// The number of elements the backing storage can hold without growing.
    fn capacity(&self) -> usize;

    /// Whether the pool holds no allocated elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes an element by id; idempotent, like
    /// [`SlotPool::remove()`].
    fn remove(&self, id: ElementId);
}

impl<T> ErasedPool for SlotPool<T> {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }

    fn remove(&self, id: ElementId) {
        Self::remove(self, id);
    }
}
