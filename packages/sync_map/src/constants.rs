/// Lock poisoning means another thread panicked while holding the lock. None
/// of our critical sections leave the map in a torn state, but continuing on
/// a poisoned lock would mask the original failure, so we propagate it.
pub(crate) const ERR_POISONED_LOCK: &str =
    "encountered poisoned lock - another thread panicked while holding it";
