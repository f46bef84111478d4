//! Cross-thread tests for `SyncMap`: no lost updates under concurrent
//! mutation from many threads.

use std::sync::Arc;

use sync_map::SyncMap;
use testing::{run_in_parallel, with_watchdog};

const THREADS: usize = 8;
const KEYS_PER_THREAD: usize = 250;

#[test]
fn disjoint_concurrent_inserts_are_all_retained() {
    with_watchdog(|| {
        let map = Arc::new(SyncMap::new());

        {
            let map = Arc::clone(&map);
            run_in_parallel(THREADS, move |thread_index| {
                for i in 0..KEYS_PER_THREAD {
                    let key = thread_index * KEYS_PER_THREAD + i;
                    map.insert(key, thread_index);
                }
            });
        }

        assert_eq!(map.len(), THREADS * KEYS_PER_THREAD);

        for key in 0..THREADS * KEYS_PER_THREAD {
            assert!(map.contains_key(&key), "key {key} was lost");
        }
    });
}

#[test]
fn concurrent_modify_does_not_lose_increments() {
    with_watchdog(|| {
        let map = Arc::new(SyncMap::new());
        map.insert("counter", 0_u64);

        {
            let map = Arc::clone(&map);
            run_in_parallel(THREADS, move |_| {
                for _ in 0..KEYS_PER_THREAD {
                    map.modify(&"counter", |value| *value += 1).unwrap();
                }
            });
        }

        assert_eq!(map.get(&"counter"), Some((THREADS * KEYS_PER_THREAD) as u64));
    });
}

#[test]
fn concurrent_get_or_insert_with_creates_one_value() {
    with_watchdog(|| {
        let map = Arc::new(SyncMap::<&str, usize>::new());

        {
            let map = Arc::clone(&map);
            run_in_parallel(THREADS, move |thread_index| {
                // Every thread proposes its own index; exactly one wins.
                let value = map.get_or_insert_with("shared", || thread_index);
                let winner = map.get(&"shared").unwrap();
                assert_eq!(value, winner);
            });
        }

        assert_eq!(map.len(), 1);
    });
}
