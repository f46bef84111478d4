//! Cross-thread tests for `Worker`: background draining, restart, stop and
//! teardown semantics.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use job_worker::Worker;
use testing::with_watchdog;

#[test]
fn background_thread_processes_jobs() {
    with_watchdog(|| {
        let (tx, rx) = mpsc::channel();

        let mut worker = Worker::new(move |job: String| {
            tx.send(job).unwrap();
        });
        worker.start();

        worker.add_job("one".to_owned()).unwrap();
        worker.add_job("two".to_owned()).unwrap();

        assert_eq!(rx.recv().unwrap(), "one");
        assert_eq!(rx.recv().unwrap(), "two");

        worker.stop();
    });
}

#[test]
fn jobs_survive_stop_and_are_flushed_on_drop() {
    with_watchdog(|| {
        let processed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&processed);

        let mut worker = Worker::new(move |_job: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        worker.start();
        worker.stop();

        // The thread is gone; these jobs sit in the queue.
        worker.add_job(1).unwrap();
        worker.add_job(2).unwrap();
        assert_eq!(worker.queued_jobs(), 2);

        drop(worker);

        assert_eq!(processed.load(Ordering::SeqCst), 2);
    });
}

#[test]
fn restarting_replaces_the_previous_thread() {
    with_watchdog(|| {
        let (tx, rx) = mpsc::channel();

        let mut worker = Worker::new(move |job: u32| {
            tx.send(job).unwrap();
        });

        worker.start();
        // A second start must join the first thread before spawning; if it
        // leaked the first one, both would race for jobs below.
        worker.start();
        assert!(worker.is_running());

        for i in 0..10 {
            worker.add_job(i).unwrap();
        }

        let received: Vec<u32> = (0..10).map(|_| rx.recv().unwrap()).collect();
        assert_eq!(received, (0..10).collect::<Vec<_>>());

        worker.stop();
        assert!(!worker.is_running());

        // Stopping again is a no-op.
        worker.stop();
    });
}

#[test]
fn stop_does_not_hang_on_idle_worker() {
    with_watchdog(|| {
        let mut worker = Worker::new(|_job: u32| ());
        worker.start();

        // Give the thread time to park on the condition variable before the
        // stop signal races it.
        std::thread::sleep(Duration::from_millis(20));

        worker.stop();
        assert!(!worker.is_running());
    });
}

#[test]
fn producers_on_many_threads_are_all_delivered() {
    with_watchdog(|| {
        const PRODUCERS: usize = 4;
        const JOBS_PER_PRODUCER: usize = 50;

        let delivered = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&delivered);

        let mut worker = Worker::builder()
            .queue_capacity(new_zealand::nz!(1024))
            .build(move |_job: usize| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        worker.start();

        let worker = Arc::new(worker);
        {
            let worker = Arc::clone(&worker);
            testing::run_in_parallel(PRODUCERS, move |thread_index| {
                for i in 0..JOBS_PER_PRODUCER {
                    worker.add_job(thread_index * JOBS_PER_PRODUCER + i).unwrap();
                }
            });
        }

        let worker = Arc::into_inner(worker).expect("all producer clones are joined");
        drop(worker);

        assert_eq!(delivered.load(Ordering::SeqCst), PRODUCERS * JOBS_PER_PRODUCER);
    });
}
