#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for testing and examples in this workspace.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Spawns `threads` OS threads, runs `f(thread_index)` on each, and joins
/// them all before returning.
///
/// A panic on any spawned thread is resumed on the calling thread after the
/// remaining threads have been joined, so a failing assertion inside `f`
/// fails the test that called this.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// static COUNTER: AtomicUsize = AtomicUsize::new(0);
///
/// testing::run_in_parallel(4, |_thread_index| {
///     COUNTER.fetch_add(1, Ordering::Relaxed);
/// });
///
/// assert_eq!(COUNTER.load(Ordering::Relaxed), 4);
/// ```
pub fn run_in_parallel<F>(threads: usize, f: F)
where
    F: Fn(usize) + Send + Sync + 'static,
{
    let f = std::sync::Arc::new(f);

    let handles = (0..threads)
        .map(|thread_index| {
            let f = std::sync::Arc::clone(&f);
            thread::spawn(move || f(thread_index))
        })
        .collect::<Vec<_>>();

    let mut first_panic = None;

    for handle in handles {
        if let Err(payload) = handle.join() {
            first_panic.get_or_insert(payload);
        }
    }

    if let Some(payload) = first_panic {
        std::panic::resume_unwind(payload);
    }
}

/// Runs a test closure with a timeout to prevent infinite hangs.
///
/// The closure runs on a helper thread. If it does not complete within the
/// timeout, the calling thread panics, so a deadlocked primitive fails the
/// suite instead of hanging CI.
///
/// # Panics
///
/// Panics if the closure exceeds the timeout.
///
/// # Example
///
/// ```rust
/// use testing::with_watchdog;
///
/// let result = with_watchdog(|| 2 + 2);
/// assert_eq!(result, 4);
/// ```
pub fn with_watchdog<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    let test_handle = thread::spawn(move || {
        let result = test_fn();
        // If this send fails, the receiver has already timed out.
        drop(tx.send(result));
    });

    // Miri is dramatically slower for thread synchronization, so a longer
    // timeout avoids false positives while still catching real hangs.
    let timeout = if cfg!(miri) {
        Duration::from_secs(60)
    } else {
        Duration::from_secs(10)
    };

    match rx.recv_timeout(timeout) {
        Ok(result) => {
            test_handle.join().expect("test thread should not panic");
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("test exceeded the watchdog timeout");
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => match test_handle.join() {
            Ok(()) => panic!("test thread disconnected unexpectedly"),
            Err(payload) => std::panic::resume_unwind(payload),
        },
    }
}
