use std::collections::hash_map::Entry;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use job_worker::Worker;
use new_zealand::nz;
use sync_map::SyncMap;
use thiserror::Error;

use crate::template::render;
use crate::{LogRecord, Logger};

/// The name of the sink every registry starts with, writing to standard
/// output.
pub const STDOUT_SINK: &str = "stdout";

/// How many records a sink can queue before the producing loggers start
/// dropping; see [`Logger::dropped_records()`].
const SINK_QUEUE_CAPACITY: std::num::NonZero<usize> = nz!(1024);

/// Errors from [`LogRegistry`] sink management.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// A sink with the requested name already exists. Sinks are never
    /// silently overwritten; pick a different name.
    #[error("a sink named '{name}' already exists")]
    SinkAlreadyExists {
        /// The requested sink name.
        name: String,
    },

    /// No sink with the requested name exists.
    #[error("no sink named '{name}' exists")]
    SinkNotFound {
        /// The requested sink name.
        name: String,
    },

    /// The log file backing a file sink could not be created.
    #[error("could not open the log file for sink '{name}'")]
    Io {
        /// The requested sink name.
        name: String,

        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// An explicitly owned collection of named loggers and sinks.
///
/// The registry is a value: whoever composes the application constructs it,
/// hands out loggers, and drops it on shutdown. There is no process-global
/// instance. Dropping the registry - once every [`Logger`] obtained from it
/// is gone too - stops each sink worker and flushes its remaining records.
///
/// Every registry starts with a [`STDOUT_SINK`] sink, which is also the
/// initial default sink for new loggers.
///
/// Loggers and sinks are created once per name and never silently
/// overwritten: asking for an existing logger name returns the existing
/// instance, and creating a sink under a taken name is an error.
///
/// # Example
///
/// ```
/// use deferred_log::{LogRegistry, Severity};
///
/// let registry = LogRegistry::new();
///
/// let logger = registry.logger("engine");
/// logger.info("started");
///
/// // The same name yields the same logger.
/// let again = registry.logger("engine");
/// again.set_max_severity(Severity::Error);
/// ```
pub struct LogRegistry {
    /// Declared before `sinks` so loggers (which hold sink worker handles)
    /// drop first and the workers can shut down when the maps go away.
    loggers: SyncMap<String, Arc<Logger>>,
    sinks: SyncMap<String, Arc<Worker<LogRecord>>>,
    default_sink: Mutex<String>,
    start: Instant,
}

impl LogRegistry {
    /// Creates a registry with the standard output sink installed and set
    /// as the default.
    #[must_use]
    pub fn new() -> Self {
        let registry = Self {
            loggers: SyncMap::new(),
            sinks: SyncMap::new(),
            default_sink: Mutex::new(STDOUT_SINK.to_owned()),
            start: Instant::now(),
        };

        registry
            .create_sink(STDOUT_SINK, Box::new(io::stdout()))
            .expect("a fresh registry has no sinks yet");

        registry
    }

    /// Creates a named sink wrapping `writer` and starts its background
    /// worker.
    ///
    /// Each record enqueued to the sink is rendered through its captured
    /// template and written as one line (with a trailing newline), followed
    /// by a flush. Write failures are swallowed: a sink that cannot accept
    /// bytes has nowhere to report that.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SinkAlreadyExists`] if the name is taken.
    pub fn create_sink(
        &self,
        name: &str,
        writer: Box<dyn Write + Send>,
    ) -> Result<(), RegistryError> {
        let writer = Mutex::new(writer);

        let mut worker = Worker::builder()
            .queue_capacity(SINK_QUEUE_CAPACITY)
            .thread_name(format!("log-sink-{name}"))
            .build(move |record: LogRecord| {
                let mut line = render(&record);
                line.push('\n');

                let mut writer = writer
                    .lock()
                    .expect("sink writer lock is only taken by this worker thread");

                // A sink that cannot accept bytes has nowhere to report it.
                drop(
                    writer
                        .write_all(line.as_bytes())
                        .and_then(|()| writer.flush()),
                );
            });
        worker.start();
        let worker = Arc::new(worker);

        self.sinks.update(name.to_owned(), |entry| match entry {
            Entry::Occupied(_) => Err(RegistryError::SinkAlreadyExists {
                name: name.to_owned(),
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(worker);
                Ok(())
            }
        })
    }

    /// Creates a named sink writing to a freshly created file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] if the file cannot be created, or
    /// [`RegistryError::SinkAlreadyExists`] if the name is taken.
    pub fn create_file_sink(
        &self,
        name: &str,
        path: impl AsRef<Path>,
    ) -> Result<(), RegistryError> {
        let file = File::create(path).map_err(|source| RegistryError::Io {
            name: name.to_owned(),
            source,
        })?;

        self.create_sink(name, Box::new(file))
    }

    /// Whether a sink with this name exists.
    #[must_use]
    pub fn sink_exists(&self, name: &str) -> bool {
        self.sinks.contains_key(name)
    }

    /// Whether a logger with this name exists.
    #[must_use]
    pub fn logger_exists(&self, name: &str) -> bool {
        self.loggers.contains_key(name)
    }

    /// Makes `name` the sink that future loggers are created against.
    ///
    /// Existing loggers keep the sink they were created with.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SinkNotFound`] if no such sink exists.
    pub fn set_default_sink(&self, name: &str) -> Result<(), RegistryError> {
        if !self.sink_exists(name) {
            return Err(RegistryError::SinkNotFound {
                name: name.to_owned(),
            });
        }

        *self
            .default_sink
            .lock()
            .expect("default sink lock has no panicking critical sections") = name.to_owned();
        Ok(())
    }

    /// Returns the logger with this name, creating it against the default
    /// sink if it does not exist yet.
    #[must_use]
    pub fn logger(&self, name: &str) -> Arc<Logger> {
        let default = self
            .default_sink
            .lock()
            .expect("default sink lock has no panicking critical sections")
            .clone();

        self.logger_with_sink(name, &default)
    }

    /// Returns the logger with this name, creating it against the named
    /// sink if it does not exist yet.
    ///
    /// An unknown sink name falls back to the default sink. An existing
    /// logger is returned as-is, keeping whatever sink it was created with.
    #[must_use]
    pub fn logger_with_sink(&self, name: &str, sink_name: &str) -> Arc<Logger> {
        let worker = self.sink_or_default(sink_name);
        let start = self.start;

        self.loggers.get_or_insert_with(name.to_owned(), || {
            Arc::new(Logger::new(name.to_owned(), worker, start))
        })
    }

    fn sink_or_default(&self, sink_name: &str) -> Arc<Worker<LogRecord>> {
        self.sinks.get(sink_name).unwrap_or_else(|| {
            let default = self
                .default_sink
                .lock()
                .expect("default sink lock has no panicking critical sections")
                .clone();

            self.sinks
                .get(&default)
                .expect("the default sink always names an existing sink")
        })
    }
}

impl Default for LogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogRegistry")
            .field("loggers", &self.loggers.len())
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}
