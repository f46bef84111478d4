use std::marker::PhantomData;
use std::num::NonZero;
use std::sync::Arc;

use bounded_queue::BoundedQueue;

use crate::Worker;

/// Builder for creating an instance of [`Worker`].
///
/// You only need the builder to customize the queue capacity or the name of
/// the background thread; [`Worker::new()`] covers the common case.
///
/// # Example
///
/// ```
/// use job_worker::Worker;
/// use new_zealand::nz;
///
/// let worker = Worker::builder()
///     .queue_capacity(nz!(256))
///     .thread_name("audit-trail")
///     .build(|_job: u64| ());
/// ```
#[must_use]
pub struct WorkerBuilder<T> {
    queue_capacity: NonZero<usize>,
    thread_name: String,

    _job: PhantomData<T>,
}

impl<T> std::fmt::Debug for WorkerBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerBuilder")
            .field(
                "job_type",
                &std::format_args!("{}", std::any::type_name::<T>()),
            )
            .field("queue_capacity", &self.queue_capacity)
            .field("thread_name", &self.thread_name)
            .finish()
    }
}

impl<T> WorkerBuilder<T>
where
    T: Send + 'static,
{
    pub(crate) fn new() -> Self {
        Self {
            queue_capacity: bounded_queue::DEFAULT_CAPACITY,
            thread_name: "job_worker".to_owned(),
            _job: PhantomData,
        }
    }

    /// Sets the capacity of the job queue.
    ///
    /// When the queue holds this many jobs, further
    /// [`add_job()`][Worker::add_job] calls fail until the consumer catches
    /// up.
    pub fn queue_capacity(mut self, capacity: NonZero<usize>) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Sets the OS thread name used by [`start()`][Worker::start], visible
    /// in debuggers and panic messages.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Builds the worker around the given job handler.
    ///
    /// No background thread exists until [`Worker::start()`] is called.
    #[must_use]
    pub fn build<F>(self, handler: F) -> Worker<T>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Worker::new_inner(
            BoundedQueue::with_capacity(self.queue_capacity),
            self.thread_name,
            Arc::new(handler),
        )
    }
}
