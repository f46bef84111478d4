/// The pool's list locks guard short, non-reentrant critical sections, so a
/// poisoned lock means an internal invariant broke and the slot state can no
/// longer be trusted.
pub(crate) const ERR_POISONED_LOCK: &str =
    "encountered poisoned lock - another thread panicked while holding it";
