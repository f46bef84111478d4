use std::fmt;

/// How serious a log record is.
///
/// The variants order from most to least severe, so severity filtering is a
/// plain comparison: a logger with a maximum of [`Severity::Warn`] passes
/// `Error` and `Warn` records and suppresses `Info` ones.
///
/// # Example
///
/// ```
/// use deferred_log::Severity;
///
/// assert!(Severity::Error < Severity::Info);
/// assert_eq!(Severity::Warn.to_string(), "Warning");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Severity {
    /// Something failed; the record should rarely be suppressed.
    Error,

    /// Something looks wrong but the operation continued.
    Warn,

    /// Routine operational detail.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "Error",
            Self::Warn => "Warning",
            Self::Info => "Info",
        };
        f.write_str(name)
    }
}
