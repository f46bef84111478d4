use thiserror::Error;

/// Returned by the closure-based lookups ([`SyncMap::read()`][1] and
/// [`SyncMap::modify()`][2]) when the key has no entry in the map.
///
/// A missing key is an error for these operations because the caller asked
/// to operate on an existing value. The plain [`SyncMap::get()`][3] lookup
/// treats a missing key as an ordinary [`None`] instead.
///
/// [1]: crate::SyncMap::read
/// [2]: crate::SyncMap::modify
/// [3]: crate::SyncMap::get
#[derive(Debug, Error, Eq, PartialEq)]
#[error("key not found in map")]
#[non_exhaustive]
pub struct KeyNotFoundError;
