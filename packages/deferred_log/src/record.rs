use std::sync::Arc;

use crate::Severity;

/// One structured log event, captured at the call site and rendered later on
/// the sink worker's thread.
///
/// The record carries everything rendering needs - including the format
/// template in effect when the call was made, so a later
/// [`Logger::set_template()`][crate::Logger::set_template] does not rewrite
/// history for records already in flight.
#[derive(Clone, Debug)]
pub struct LogRecord {
    message: String,
    severity: Severity,
    component: String,
    template: Arc<str>,
    elapsed_seconds: f32,
}

impl LogRecord {
    pub(crate) fn new(
        message: String,
        severity: Severity,
        component: String,
        template: Arc<str>,
        elapsed_seconds: f32,
    ) -> Self {
        Self {
            message,
            severity,
            component,
            template,
            elapsed_seconds,
        }
    }

    /// The already-formatted message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// How serious the event is.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The name of the logger that produced the record.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// The format template in effect when the record was captured.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Seconds elapsed since the owning registry was constructed.
    #[must_use]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed_seconds
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(LogRecord: Send, Sync, Clone, Debug);

    #[test]
    fn accessors_return_captured_fields() {
        let record = LogRecord::new(
            "it broke".to_owned(),
            Severity::Error,
            "engine".to_owned(),
            Arc::from("{message}"),
            1.5,
        );

        assert_eq!(record.message(), "it broke");
        assert_eq!(record.severity(), Severity::Error);
        assert_eq!(record.component(), "engine");
        assert_eq!(record.template(), "{message}");
        assert!((record.elapsed_seconds() - 1.5).abs() < f32::EPSILON);
    }
}
