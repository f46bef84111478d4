use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use job_worker::Worker;

use crate::{LogRecord, Severity};

/// The template used by loggers that never called
/// [`set_template()`][Logger::set_template].
pub const DEFAULT_TEMPLATE: &str = "[{time}] [{component}] [{level}] {message}";

/// A named producer of log records.
///
/// Each call to [`error()`][Self::error], [`warn()`][Self::warn] or
/// [`info()`][Self::info] captures a [`LogRecord`] and enqueues it on the
/// sink worker this logger was created against; rendering and I/O happen on
/// that worker's background thread. The call site does no I/O and never
/// blocks on the sink.
///
/// # Backpressure
///
/// If the sink's queue is full the record is dropped and
/// [`dropped_records()`][Self::dropped_records] increments. A logging call
/// site that stalls because a disk is slow would be worse than a lost
/// diagnostic line.
///
/// Loggers are obtained from a [`LogRegistry`][crate::LogRegistry], which
/// keeps one instance per name.
///
/// # Example
///
/// ```
/// use deferred_log::LogRegistry;
///
/// let registry = LogRegistry::new();
/// let logger = registry.logger("network");
///
/// logger.set_template("{component}: {message}");
/// logger.info("connected");
/// ```
pub struct Logger {
    name: String,
    template: Mutex<Arc<str>>,
    max_severity: Mutex<Severity>,
    worker: Arc<Worker<LogRecord>>,
    start: Instant,
    dropped_records: AtomicU64,
}

impl Logger {
    pub(crate) fn new(name: String, worker: Arc<Worker<LogRecord>>, start: Instant) -> Self {
        Self {
            name,
            template: Mutex::new(Arc::from(DEFAULT_TEMPLATE)),
            max_severity: Mutex::new(Severity::Info),
            worker,
            start,
            dropped_records: AtomicU64::new(0),
        }
    }

    /// The logger's name, rendered by the `{component}` placeholder.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records an [`Severity::Error`] event.
    pub fn error(&self, message: impl Into<String>) {
        self.send(Severity::Error, message.into());
    }

    /// Records a [`Severity::Warn`] event.
    pub fn warn(&self, message: impl Into<String>) {
        self.send(Severity::Warn, message.into());
    }

    /// Records a [`Severity::Info`] event.
    pub fn info(&self, message: impl Into<String>) {
        self.send(Severity::Info, message.into());
    }

    /// Replaces the format template for records captured from now on.
    ///
    /// Records already enqueued keep the template they were captured with.
    /// See [`render`][crate::LogRecord] placeholders: `{time}`,
    /// `{component}`, `{level}`, `{message}`.
    pub fn set_template(&self, template: impl Into<Arc<str>>) {
        *self
            .template
            .lock()
            .expect("logger template lock has no panicking critical sections") = template.into();
    }

    /// Suppresses records less severe than `severity`.
    ///
    /// The default is [`Severity::Info`], i.e. everything passes.
    pub fn set_max_severity(&self, severity: Severity) {
        *self
            .max_severity
            .lock()
            .expect("logger severity lock has no panicking critical sections") = severity;
    }

    /// The number of records dropped because the sink queue was full.
    #[must_use]
    pub fn dropped_records(&self) -> u64 {
        self.dropped_records.load(Ordering::Relaxed)
    }

    fn send(&self, severity: Severity, message: String) {
        let max = *self
            .max_severity
            .lock()
            .expect("logger severity lock has no panicking critical sections");
        if severity > max {
            return;
        }

        let template = Arc::clone(
            &self
                .template
                .lock()
                .expect("logger template lock has no panicking critical sections"),
        );

        let record = LogRecord::new(
            message,
            severity,
            self.name.clone(),
            template,
            self.start.elapsed().as_secs_f32(),
        );

        if self.worker.add_job(record).is_err() {
            self.dropped_records.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("dropped_records", &self.dropped_records())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(
        clippy::indexing_slicing,
        reason = "we do not need to worry about these things when writing test code"
    )]

    use std::sync::Mutex as StdMutex;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Logger: Send, Sync);

    /// A logger whose sink worker appends records to a shared transcript
    /// instead of writing anywhere. Flush the worker to observe them.
    fn capturing_logger(queue_capacity: usize) -> (Logger, Arc<Worker<LogRecord>>, Arc<StdMutex<Vec<LogRecord>>>) {
        let transcript = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&transcript);

        let worker = Arc::new(
            Worker::builder()
                .queue_capacity(queue_capacity.try_into().expect("test capacities are nonzero"))
                .build(move |record: LogRecord| {
                    sink.lock().unwrap().push(record);
                }),
        );

        let logger = Logger::new("test".to_owned(), Arc::clone(&worker), Instant::now());
        (logger, worker, transcript)
    }

    #[test]
    fn records_carry_severity_and_component() {
        let (logger, worker, transcript) = capturing_logger(16);

        logger.error("broken");
        logger.info("running");
        worker.flush();

        let records = transcript.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].severity(), Severity::Error);
        assert_eq!(records[0].message(), "broken");
        assert_eq!(records[0].component(), "test");
        assert_eq!(records[1].severity(), Severity::Info);
    }

    #[test]
    fn max_severity_suppresses_less_severe_records() {
        let (logger, worker, transcript) = capturing_logger(16);

        logger.set_max_severity(Severity::Error);
        logger.info("suppressed");
        logger.warn("also suppressed");
        logger.error("kept");
        worker.flush();

        let records = transcript.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message(), "kept");
    }

    #[test]
    fn records_capture_the_template_in_effect() {
        let (logger, worker, transcript) = capturing_logger(16);

        logger.info("before");
        logger.set_template("{message}");
        logger.info("after");
        worker.flush();

        let records = transcript.lock().unwrap();
        assert_eq!(records[0].template(), DEFAULT_TEMPLATE);
        assert_eq!(records[1].template(), "{message}");
    }

    #[test]
    fn full_sink_queue_drops_and_counts() {
        let (logger, worker, transcript) = capturing_logger(1);

        logger.info("first");
        logger.info("second");

        assert_eq!(logger.dropped_records(), 1);

        worker.flush();
        assert_eq!(transcript.lock().unwrap().len(), 1);
    }

    #[test]
    fn elapsed_time_grows_monotonically() {
        let (logger, worker, transcript) = capturing_logger(16);

        logger.info("a");
        logger.info("b");
        worker.flush();

        let records = transcript.lock().unwrap();
        assert!(records[0].elapsed_seconds() <= records[1].elapsed_seconds());
    }
}
