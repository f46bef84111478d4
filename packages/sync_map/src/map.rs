use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::Hash;
use std::sync::RwLock;

use foldhash::{HashMap, HashMapExt};

use crate::{ERR_POISONED_LOCK, KeyNotFoundError};

/// A hash map protected by a single reader-writer lock.
///
/// All methods take `&self`; the lock is acquired internally per operation
/// and released before the method returns, so the type can be shared freely
/// between threads (directly or inside an `Arc`).
///
/// Reads take the shared lock; every operation that can mutate the map -
/// including the insert-on-miss accessors - takes the exclusive lock.
///
/// # Returning values
///
/// An operation cannot hand out a plain `&V` because the borrow would
/// outlive the lock guard. Lookups therefore either clone the value
/// ([`get()`][Self::get]) or run a caller-supplied closure against the
/// borrowed value while the lock is held ([`read()`][Self::read],
/// [`modify()`][Self::modify]).
///
/// # Iteration
///
/// [`for_each()`][Self::for_each] visits every entry under the shared lock.
/// Calling any mutating method on the same map from inside the closure
/// deadlocks; mutation during iteration is not supported.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use sync_map::SyncMap;
///
/// let map = Arc::new(SyncMap::new());
///
/// let writer = {
///     let map = Arc::clone(&map);
///     thread::spawn(move || {
///         map.insert("answer", 42);
///     })
/// };
///
/// writer.join().unwrap();
/// assert_eq!(map.get(&"answer"), Some(42));
/// ```
pub struct SyncMap<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> SyncMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Creates an empty map with space for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }

    /// The number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect(ERR_POISONED_LOCK).len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect(ERR_POISONED_LOCK).is_empty()
    }

    /// Whether the map has an entry for `key`.
    ///
    /// Note that by the time the caller acts on the answer, another thread
    /// may already have changed the map; to check-then-act atomically, use
    /// [`read()`][Self::read], [`modify()`][Self::modify] or
    /// [`update()`][Self::update] instead.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner
            .read()
            .expect(ERR_POISONED_LOCK)
            .contains_key(key)
    }

    /// Inserts a key-value pair, returning the previous value for the key if
    /// one existed.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner
            .write()
            .expect(ERR_POISONED_LOCK)
            .insert(key, value)
    }

    /// Inserts every pair from `entries` under a single exclusive lock
    /// acquisition.
    ///
    /// # Example
    ///
    /// ```
    /// use sync_map::SyncMap;
    ///
    /// let map = SyncMap::new();
    /// map.insert_all([("a", 1), ("b", 2)]);
    ///
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn insert_all<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.inner
            .write()
            .expect(ERR_POISONED_LOCK)
            .extend(entries);
    }

    /// Removes the entry for `key`, returning its value if one existed.
    ///
    /// Removing an absent key is a no-op, observable via
    /// [`contains_key()`][Self::contains_key] and [`len()`][Self::len].
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.write().expect(ERR_POISONED_LOCK).remove(key)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.write().expect(ERR_POISONED_LOCK).clear();
    }

    /// Runs `f` against the value for `key` under the shared lock.
    ///
    /// This is the lookup to use when the value should not be cloned or when
    /// several reads of it must observe one consistent state.
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFoundError`] if the map has no entry for `key`.
    pub fn read<Q, R>(&self, key: &Q, f: impl FnOnce(&V) -> R) -> Result<R, KeyNotFoundError>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let guard = self.inner.read().expect(ERR_POISONED_LOCK);
        guard.get(key).map(f).ok_or(KeyNotFoundError)
    }

    /// Runs `f` against the value for `key` under the exclusive lock.
    ///
    /// The check for the key and the mutation are one critical section, so
    /// no other thread can remove the entry in between.
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFoundError`] if the map has no entry for `key`.
    pub fn modify<Q, R>(&self, key: &Q, f: impl FnOnce(&mut V) -> R) -> Result<R, KeyNotFoundError>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let mut guard = self.inner.write().expect(ERR_POISONED_LOCK);
        guard.get_mut(key).map(f).ok_or(KeyNotFoundError)
    }

    /// Runs `f` against the map entry for `key` under the exclusive lock.
    ///
    /// This is the escape hatch for callers that need full occupied/vacant
    /// control in one critical section - e.g. replace the value only if the
    /// current one fails some test, inserting otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use sync_map::SyncMap;
    ///
    /// let map = SyncMap::new();
    /// map.insert("hits", 1_u32);
    ///
    /// map.update("hits", |entry| {
    ///     *entry.or_insert(0) += 1;
    /// });
    ///
    /// assert_eq!(map.get(&"hits"), Some(2));
    /// ```
    pub fn update<R>(&self, key: K, f: impl FnOnce(Entry<'_, K, V>) -> R) -> R {
        let mut guard = self.inner.write().expect(ERR_POISONED_LOCK);
        f(guard.entry(key))
    }

    /// Visits every entry under the shared lock, in unspecified order.
    ///
    /// Mutating the map from inside `f` deadlocks; see the type-level notes
    /// on iteration.
    pub fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        let guard = self.inner.read().expect(ERR_POISONED_LOCK);
        for (key, value) in guard.iter() {
            f(key, value);
        }
    }
}

impl<K, V> SyncMap<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Returns a clone of the value for `key`, or [`None`] if there is no
    /// entry.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.read().expect(ERR_POISONED_LOCK).get(key).cloned()
    }

    /// Returns a clone of the value for `key`, inserting one built by `make`
    /// first if there is no entry.
    ///
    /// The whole operation holds the exclusive lock: insert-on-miss is a
    /// write, and classifying it as a read would race with concurrent
    /// writers.
    pub fn get_or_insert_with(&self, key: K, make: impl FnOnce() -> V) -> V {
        let mut guard = self.inner.write().expect(ERR_POISONED_LOCK);
        guard.entry(key).or_insert_with(make).clone()
    }

    /// Returns a clone of the value for `key`, inserting `V::default()`
    /// first if there is no entry.
    ///
    /// # Example
    ///
    /// ```
    /// use sync_map::SyncMap;
    ///
    /// let map = SyncMap::<&str, u32>::new();
    ///
    /// assert_eq!(map.get_or_default("missing"), 0);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn get_or_default(&self, key: K) -> V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }
}

impl<K, V> Default for SyncMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for SyncMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl<K, V> fmt::Debug for SyncMap<K, V>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.inner.read().expect(ERR_POISONED_LOCK);
        f.debug_struct("SyncMap").field("inner", &*guard).finish()
    }
}
