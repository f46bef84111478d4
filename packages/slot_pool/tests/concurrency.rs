//! Cross-thread tests for `SlotPool`: concurrent add/get/remove cycles must
//! leave the pool consistent with no slot leaked or double-freed.

use std::sync::Arc;

use slot_pool::SlotPool;
use testing::{run_in_parallel, with_watchdog};

#[test]
fn concurrent_add_get_remove_cycles_leave_pool_empty() {
    with_watchdog(|| {
        const THREADS: usize = 8;
        const CYCLES: usize = 200;

        let pool = Arc::new(SlotPool::new());

        {
            let pool = Arc::clone(&pool);
            run_in_parallel(THREADS, move |thread_index| {
                for i in 0..CYCLES {
                    let id = pool.add(thread_index * CYCLES + i);

                    let accessor = pool.get(id).expect("just-added id must resolve");
                    assert_eq!(*accessor, thread_index * CYCLES + i);

                    pool.remove(id);
                }
            });
        }

        assert_eq!(pool.len(), 0);
    });
}

#[test]
fn concurrent_removal_with_held_accessors_reclaims_everything() {
    with_watchdog(|| {
        const THREADS: usize = 4;
        const CYCLES: usize = 100;

        let pool = Arc::new(SlotPool::new());

        {
            let pool = Arc::clone(&pool);
            run_in_parallel(THREADS, move |_| {
                for i in 0..CYCLES {
                    let id = pool.add(i);
                    let accessor = pool.get(id).expect("just-added id must resolve");

                    // Remove while pinned: the slot goes to garbage and must
                    // come back once the accessor drops.
                    pool.remove(id);
                    assert!(pool.get(id).is_none());

                    drop(accessor);
                }
            });
        }

        // Every garbage slot was released, so the pool is fully reusable.
        assert_eq!(pool.len(), 0);

        let recycled = pool.add(0);
        let low_ids: Vec<_> = (0..THREADS * CYCLES).map(|_| pool.add(0)).collect();

        // Freed capacity is recycled rather than growing without bound.
        assert!(pool.capacity() <= 2 * (THREADS * CYCLES + 1));

        pool.remove(recycled);
        for id in low_ids {
            pool.remove(id);
        }
    });
}

#[test]
fn accessors_shared_across_threads_read_the_same_element() {
    with_watchdog(|| {
        let pool = SlotPool::new();
        let id = pool.add("shared".to_owned());

        let accessor = pool.get(id).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let accessor = accessor.clone();
                std::thread::spawn(move || accessor.len())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "shared".len());
        }

        pool.remove(id);
    });
}
