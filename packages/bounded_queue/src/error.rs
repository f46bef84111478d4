use thiserror::Error;

/// Returned by [`BoundedQueue::push()`][crate::BoundedQueue::push] when the
/// queue is already at capacity.
///
/// The error carries the rejected value so the caller can retry later, route
/// it elsewhere, or drop it deliberately.
///
/// # Example
///
/// ```
/// use bounded_queue::BoundedQueue;
/// use new_zealand::nz;
///
/// let mut queue = BoundedQueue::with_capacity(nz!(1));
/// queue.push(1_u32).unwrap();
///
/// let error = queue.push(2).unwrap_err();
/// assert_eq!(error.capacity(), 1);
/// assert_eq!(error.into_value(), 2);
/// ```
#[derive(Debug, Error)]
#[error("queue is full at capacity {capacity}")]
pub struct CapacityError<T> {
    value: T,
    capacity: usize,
}

impl<T> CapacityError<T> {
    pub(crate) fn new(value: T, capacity: usize) -> Self {
        Self { value, capacity }
    }

    /// The value the queue refused to accept.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the error, returning the rejected value to the caller.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// The capacity of the queue that rejected the value.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(CapacityError<u32>: Send, Sync, Debug);

    #[test]
    fn reports_capacity_in_message() {
        let error = CapacityError::new("hello", 4);

        assert_eq!(error.to_string(), "queue is full at capacity 4");
    }

    #[test]
    fn returns_rejected_value() {
        let error = CapacityError::new("hello".to_owned(), 4);

        assert_eq!(error.value(), "hello");
        assert_eq!(error.into_value(), "hello");
    }
}
