use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use crate::Observer;

/// An ordered broadcast list of weak references to [`Observer`]s.
///
/// Subscribers are notified in subscription order, synchronously, on the
/// thread that calls [`notify()`][Self::notify]. The subject holds only
/// weak references: a dropped observer silently falls off the list the next
/// time a notification pass encounters it (lazy pruning), so
/// [`len()`][Self::len] only reflects reality after a
/// [`notify()`][Self::notify] or an explicit [`prune()`][Self::prune].
///
/// # Locking
///
/// One mutex guards the whole list and is held for the entire notification
/// pass, including while each callback runs. A slow or blocking callback
/// therefore serializes all concurrent `subscribe`/`notify` calls on this
/// subject, and a callback must not call back into the same subject. This
/// trades throughput for simplicity, deliberately.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// use observers::Subject;
///
/// let subject = Subject::new();
/// let total = Arc::new(AtomicU32::new(0));
///
/// let sink = Arc::clone(&total);
/// let observer = subject.subscribe_fn(move |value: &u32| {
///     sink.fetch_add(*value, Ordering::Relaxed);
/// });
///
/// subject.notify(&3);
/// subject.notify(&4);
///
/// assert_eq!(total.load(Ordering::Relaxed), 7);
/// observer.unsubscribe();
/// ```
pub struct Subject<T> {
    observers: Mutex<Vec<Weak<Observer<T>>>>,
}

impl<T> Subject<T> {
    /// Creates a subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Appends a weak reference to the subscription list.
    ///
    /// The subject takes no ownership; the caller keeps the strong
    /// reference and the lifetime obligations that come with it.
    pub fn subscribe(&self, observer: Weak<Observer<T>>) {
        self.observers
            .lock()
            .expect("subject list lock poisoned by a panicking callback")
            .push(observer);
    }

    /// Creates an observer wrapping `callback`, subscribes it, and returns
    /// the strong reference.
    ///
    /// The caller owns the returned `Arc` and must call
    /// [`Observer::unsubscribe()`] before dropping anything the callback
    /// captures by reference.
    pub fn subscribe_fn<F>(&self, callback: F) -> Arc<Observer<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let observer = Observer::new(callback);
        self.subscribe(Arc::downgrade(&observer));
        observer
    }

    /// Delivers `args` to every still-resolvable observer, in subscription
    /// order, on the calling thread.
    ///
    /// Weak references that no longer resolve are removed from the list
    /// during this same pass. A panic inside a callback propagates to the
    /// caller; observers later in the list are not notified in that case.
    pub fn notify(&self, args: &T) {
        let mut observers = self
            .observers
            .lock()
            .expect("subject list lock poisoned by a panicking callback");

        observers.retain(|weak| match weak.upgrade() {
            Some(observer) => {
                observer.call(args);
                true
            }
            None => false,
        });
    }

    /// Removes dead weak references without notifying anyone.
    pub fn prune(&self) {
        self.observers
            .lock()
            .expect("subject list lock poisoned by a panicking callback")
            .retain(|weak| weak.strong_count() > 0);
    }

    /// The number of list entries, including observers that have been
    /// dropped but not yet pruned; see the type-level notes on lazy
    /// pruning.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers
            .lock()
            .expect("subject list lock poisoned by a panicking callback")
            .len()
    }

    /// Whether the subscription list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
