/// The stable handle of an element in a [`SlotPool`][crate::SlotPool].
///
/// Ids are opaque; they stay valid for the element's logical lifetime and
/// may be reused by the pool for a different element after removal (the
/// lowest freed id is always reused first). Holding an `ElementId` does not
/// keep the element alive - that is what [`Accessor`][crate::Accessor] is
/// for.
///
/// # Example
///
/// ```
/// use slot_pool::SlotPool;
///
/// let pool = SlotPool::new();
///
/// let id = pool.add(42);
/// let copy = id;
///
/// // Ids are plain copyable values.
/// assert_eq!(id, copy);
/// assert_eq!(*pool.get(copy).unwrap(), 42);
/// # pool.remove(id);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ElementId {
    index: usize,
}

impl ElementId {
    pub(crate) fn new(index: usize) -> Self {
        Self { index }
    }

    pub(crate) fn index(self) -> usize {
        self.index
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(ElementId: Copy, Eq, Ord, Send, Sync, Debug);

    #[test]
    fn ids_order_by_slot_index() {
        assert!(ElementId::new(0) < ElementId::new(1));
        assert_eq!(ElementId::new(3), ElementId::new(3));
    }
}
