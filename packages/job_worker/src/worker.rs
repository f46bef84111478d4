use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use bounded_queue::{BoundedQueue, CapacityError};

use crate::WorkerBuilder;
use crate::constants::ERR_POISONED_LOCK;

/// The handler invoked for each job, on whichever thread drains the queue.
pub(crate) type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

/// A job runner with a bounded queue and at most one background thread.
///
/// Jobs enqueued with [`add_job()`][Self::add_job] are delivered to the
/// handler in FIFO order, exactly once each, up to process termination.
/// Without a started thread the queue simply accumulates until someone calls
/// [`flush()`][Self::flush]; with one, the thread parks on a condition
/// variable while the queue is empty and drains it when signaled.
///
/// Dropping the worker stops the background thread and then flushes whatever
/// is still queued on the dropping thread, so accepted jobs are not lost on
/// teardown.
///
/// # Handler panics
///
/// A panicking handler does not kill the worker and cannot poison the queue
/// lock, because handlers run outside it. The panic is caught, the job
/// counts as consumed, the [`panicked_jobs()`][Self::panicked_jobs] counter
/// increments, and draining continues with the next job. Jobs must not rely
/// on a preceding job having completed normally.
///
/// # Example
///
/// ```
/// use std::sync::mpsc;
///
/// use job_worker::Worker;
///
/// let (tx, rx) = mpsc::channel();
///
/// let mut worker = Worker::new(move |job: &str| {
///     tx.send(job.len()).unwrap();
/// });
/// worker.start();
///
/// worker.add_job("hello").unwrap();
/// assert_eq!(rx.recv().unwrap(), 5);
/// ```
pub struct Worker<T>
where
    T: Send + 'static,
{
    shared: Arc<Shared<T>>,
    handler: Handler<T>,
    thread_name: String,
    thread: Option<JoinHandle<()>>,
}

/// The state shared between the owning handle and the background thread.
struct Shared<T> {
    queue: Mutex<BoundedQueue<T>>,
    work_available: Condvar,
    stop: AtomicBool,
    panicked_jobs: AtomicU64,
}

impl<T> Worker<T>
where
    T: Send + 'static,
{
    /// Creates a worker with the default configuration and the given
    /// handler. No background thread exists until
    /// [`start()`][Self::start] is called.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self::builder().build(handler)
    }

    /// Starts building a worker with a custom queue capacity or thread name.
    ///
    /// # Example
    ///
    /// ```
    /// use job_worker::Worker;
    /// use new_zealand::nz;
    ///
    /// let worker = Worker::builder()
    ///     .queue_capacity(nz!(128))
    ///     .thread_name("renderer")
    ///     .build(|_job: String| ());
    ///
    /// assert_eq!(worker.queue_capacity(), 128);
    /// ```
    pub fn builder() -> WorkerBuilder<T> {
        WorkerBuilder::new()
    }

    pub(crate) fn new_inner(
        queue: BoundedQueue<T>,
        thread_name: String,
        handler: Handler<T>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(queue),
                work_available: Condvar::new(),
                stop: AtomicBool::new(false),
                panicked_jobs: AtomicU64::new(0),
            }),
            handler,
            thread_name,
            thread: None,
        }
    }

    /// Enqueues a job and signals the background thread, if one is running.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] carrying the job back if the queue is full.
    /// The caller decides whether to retry, block, or drop.
    pub fn add_job(&self, job: T) -> Result<(), CapacityError<T>> {
        self.shared
            .queue
            .lock()
            .expect(ERR_POISONED_LOCK)
            .push(job)?;

        self.shared.work_available.notify_all();
        Ok(())
    }

    /// Drains the queue on the calling thread, invoking the handler per job
    /// in FIFO order, until a pop observes the queue empty.
    ///
    /// Jobs enqueued concurrently while the drain is in progress may or may
    /// not be included - no snapshot of the queue is taken.
    pub fn flush(&self) {
        drain(&self.shared, &self.handler);
    }

    /// Starts the background thread.
    ///
    /// If a background thread already exists it is stopped (signaled and
    /// joined) first, so there is exactly one background thread at any time.
    pub fn start(&mut self) {
        self.stop();

        self.shared.stop.store(false, Ordering::SeqCst);

        let shared = Arc::clone(&self.shared);
        let handler = Arc::clone(&self.handler);

        let handle = std::thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn(move || thread_main(&shared, &handler))
            .expect("spawning the worker thread failed - the process is out of threads");

        self.thread = Some(handle);
    }

    /// Signals the background thread to stop and joins it.
    ///
    /// Jobs still queued when the thread observes the stop signal remain in
    /// the queue; they are delivered by the next [`flush()`][Self::flush]
    /// or on drop. Calling this with no thread running is a no-op.
    #[cfg_attr(test, mutants::skip)] // Can be mutated into a join that never gets its wakeup.
    pub fn stop(&mut self) {
        {
            // The store must happen under the queue lock: otherwise it could
            // interleave between the thread's empty-check and its wait, and
            // the notification below would be lost.
            let _queue = self.shared.queue.lock().expect(ERR_POISONED_LOCK);
            self.shared.stop.store(true, Ordering::SeqCst);
        }
        self.shared.work_available.notify_all();

        if let Some(handle) = self.thread.take() {
            // The thread catches handler panics itself, so a join error
            // means the drain loop broke, which is our bug.
            handle
                .join()
                .expect("worker background thread panicked outside the job handler");
        }
    }

    /// Whether a background thread currently exists.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// The number of jobs currently waiting in the queue.
    #[must_use]
    pub fn queued_jobs(&self) -> usize {
        self.shared.queue.lock().expect(ERR_POISONED_LOCK).len()
    }

    /// The capacity of the job queue.
    #[must_use]
    pub fn queue_capacity(&self) -> usize {
        self.shared
            .queue
            .lock()
            .expect(ERR_POISONED_LOCK)
            .capacity()
    }

    /// The number of jobs whose handler invocation panicked.
    ///
    /// Those jobs count as consumed; see the type-level notes on handler
    /// panics.
    #[must_use]
    pub fn panicked_jobs(&self) -> u64 {
        self.shared.panicked_jobs.load(Ordering::Relaxed)
    }
}

impl<T> Drop for Worker<T>
where
    T: Send + 'static,
{
    fn drop(&mut self) {
        self.stop();
        self.flush();
    }
}

impl<T> fmt::Debug for Worker<T>
where
    T: Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("thread_name", &self.thread_name)
            .field("is_running", &self.is_running())
            .field("queued_jobs", &self.queued_jobs())
            .finish_non_exhaustive()
    }
}

/// The background thread body: park while empty, drain when signaled,
/// repeat until stopped.
#[cfg_attr(test, mutants::skip)] // Can be mutated into an endless wait.
fn thread_main<T>(shared: &Shared<T>, handler: &Handler<T>)
where
    T: Send + 'static,
{
    loop {
        {
            let mut queue = shared.queue.lock().expect(ERR_POISONED_LOCK);

            while queue.is_empty() && !shared.stop.load(Ordering::SeqCst) {
                queue = shared
                    .work_available
                    .wait(queue)
                    .expect(ERR_POISONED_LOCK);
            }
        }

        if shared.stop.load(Ordering::SeqCst) {
            // Anything still queued is delivered by the owner's final flush.
            return;
        }

        drain(shared, handler);
    }
}

/// Pops and runs jobs until a pop observes the queue empty.
///
/// The queue lock is held only across the pop; the handler runs outside it
/// so that producers are never blocked on user code and a handler panic
/// cannot poison the lock.
fn drain<T>(shared: &Shared<T>, handler: &Handler<T>)
where
    T: Send + 'static,
{
    loop {
        let job = shared.queue.lock().expect(ERR_POISONED_LOCK).pop();

        let Some(job) = job else {
            return;
        };

        if panic::catch_unwind(AssertUnwindSafe(|| handler(job))).is_err() {
            shared.panicked_jobs.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Mutex as StdMutex;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Worker<String>: Send, Sync);

    /// A handler that appends each job to a shared transcript.
    fn recording_worker() -> (Worker<String>, Arc<StdMutex<Vec<String>>>) {
        let transcript = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&transcript);

        let worker = Worker::new(move |job: String| {
            sink.lock().unwrap().push(job);
        });

        (worker, transcript)
    }

    #[test]
    fn flush_on_empty_queue_does_nothing() {
        let (worker, transcript) = recording_worker();

        worker.flush();

        assert!(transcript.lock().unwrap().is_empty());
    }

    #[test]
    fn flush_runs_single_job() {
        let (worker, transcript) = recording_worker();

        worker.add_job("test".to_owned()).unwrap();
        worker.flush();

        assert_eq!(*transcript.lock().unwrap(), ["test"]);
    }

    #[test]
    fn flush_runs_jobs_in_fifo_order() {
        let (worker, transcript) = recording_worker();

        worker.add_job("a".to_owned()).unwrap();
        worker.add_job("b".to_owned()).unwrap();
        worker.flush();

        assert_eq!(*transcript.lock().unwrap(), ["a", "b"]);
    }

    #[test]
    fn jobs_accumulate_until_flushed() {
        let (worker, transcript) = recording_worker();

        worker.add_job("a".to_owned()).unwrap();

        assert_eq!(worker.queued_jobs(), 1);
        assert!(transcript.lock().unwrap().is_empty());

        worker.flush();

        assert_eq!(worker.queued_jobs(), 0);
        assert_eq!(transcript.lock().unwrap().len(), 1);
    }

    #[test]
    fn add_job_surfaces_queue_capacity() {
        let worker = Worker::builder()
            .queue_capacity(new_zealand::nz!(1))
            .build(|_job: u32| ());

        worker.add_job(1).unwrap();

        let error = worker.add_job(2).unwrap_err();
        assert_eq!(error.into_value(), 2);

        // The rejected job did not displace the accepted one.
        assert_eq!(worker.queued_jobs(), 1);
    }

    #[test]
    fn panicking_handler_is_counted_and_skipped() {
        let (worker, transcript) = {
            let transcript = Arc::new(StdMutex::new(Vec::new()));
            let sink = Arc::clone(&transcript);

            let worker = Worker::new(move |job: String| {
                assert_ne!(job, "boom", "this job always fails");
                sink.lock().unwrap().push(job);
            });

            (worker, transcript)
        };

        worker.add_job("a".to_owned()).unwrap();
        worker.add_job("boom".to_owned()).unwrap();
        worker.add_job("b".to_owned()).unwrap();
        worker.flush();

        assert_eq!(*transcript.lock().unwrap(), ["a", "b"]);
        assert_eq!(worker.panicked_jobs(), 1);
    }

    #[test]
    fn drop_flushes_remaining_jobs() {
        let (worker, transcript) = recording_worker();

        worker.add_job("pending".to_owned()).unwrap();
        drop(worker);

        assert_eq!(*transcript.lock().unwrap(), ["pending"]);
    }
}
