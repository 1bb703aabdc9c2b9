//! Backend severity levels and the level-to-severity mapping

use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity understood by the error-tracking backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// Map a front-end log level to a backend severity.
    ///
    /// Total over the whole level domain: values outside the named range
    /// are classified as `Fatal` so an unrecognized level can never be
    /// silently downgraded.
    pub fn from_level(level: LogLevel) -> Severity {
        match level {
            LogLevel::DEBUG | LogLevel::INFO => Severity::Info,
            LogLevel::WARN => Severity::Warning,
            LogLevel::ERROR => Severity::Error,
            LogLevel::DPANIC | LogLevel::PANIC | LogLevel::FATAL => Severity::Fatal,
            _ => Severity::Fatal,
        }
    }

    /// Whether this severity belongs to the fatal tier, which requires a
    /// synchronous flush before the write call returns.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Severity::Fatal)
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}
