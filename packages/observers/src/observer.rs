use std::fmt;
use std::sync::{Arc, RwLock};

/// The callback held by an [`Observer`], invoked once per notification.
pub(crate) type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;

/// A subscriber wrapping a callback, addressed by weak reference from a
/// [`Subject`][crate::Subject].
///
/// Observers only exist behind an `Arc` - [`new()`][Self::new] returns one
/// directly - because subjects hold weak references and somebody has to own
/// the strong one. That owner is the caller, and with ownership comes the
/// lifetime contract:
///
/// **[`unsubscribe()`][Self::unsubscribe] must be called before any state
/// the callback captures by reference goes away.** The observer does not
/// protect captured state itself. Dropping an observer that was never
/// unsubscribed trips a debug assertion, because it usually means the
/// callback could have run against dangling context.
///
/// # Example
///
/// ```
/// use observers::Observer;
///
/// let observer = Observer::new(|value: &u32| {
///     println!("observed {value}");
/// });
///
/// observer.call(&1);
///
/// observer.unsubscribe();
/// // After unsubscribing, calls are no-ops.
/// observer.call(&2);
/// ```
pub struct Observer<T> {
    /// `None` means unsubscribed. Callback invocation takes the shared
    /// lock, unsubscription the exclusive one, so a callback never runs
    /// concurrently with (or after) its own teardown.
    callback: RwLock<Option<Callback<T>>>,
}

impl<T> Observer<T> {
    /// Creates an observer wrapping `callback`, behind the `Arc` that the
    /// caller owns for its whole lifetime.
    #[must_use]
    pub fn new<F>(callback: F) -> Arc<Self>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Arc::new(Self {
            callback: RwLock::new(Some(Box::new(callback))),
        })
    }

    /// Invokes the callback with `args`, unless the observer has
    /// unsubscribed, in which case this is a no-op.
    pub fn call(&self, args: &T) {
        let guard = self
            .callback
            .read()
            .expect("observer callback lock poisoned by a panicking callback");

        if let Some(callback) = guard.as_ref() {
            callback(args);
        }
    }

    /// Clears the callback so it can never run again. Idempotent.
    ///
    /// Must happen before anything the callback captures by reference is
    /// dropped; see the type-level contract.
    pub fn unsubscribe(&self) {
        let mut guard = self
            .callback
            .write()
            .expect("observer callback lock poisoned by a panicking callback");

        *guard = None;
    }

    /// Whether the callback has been cleared.
    #[must_use]
    pub fn is_unsubscribed(&self) -> bool {
        self.callback
            .read()
            .expect("observer callback lock poisoned by a panicking callback")
            .is_none()
    }
}

impl<T> Drop for Observer<T> {
    fn drop(&mut self) {
        // We have exclusive access during drop, so no lock is needed.
        let subscribed = self
            .callback
            .get_mut()
            .map(|callback| callback.is_some())
            .unwrap_or_default();

        debug_assert!(
            !subscribed,
            "observer dropped while still subscribed - call unsubscribe() before \
             the state captured by the callback goes out of scope"
        );
    }
}

impl<T> fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("is_unsubscribed", &self.is_unsubscribed())
            .finish_non_exhaustive()
    }
}

/// Type-erased unsubscription, for callers that tear down observers of
/// mixed notification types in one sweep.
pub trait Unsubscribe {
    /// Clears the callback so it can never run again. Idempotent.
    fn unsubscribe(&self);
}

impl<T> Unsubscribe for Observer<T> {
    fn unsubscribe(&self) {
        Self::unsubscribe(self);
    }
}
