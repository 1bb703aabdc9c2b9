//! Log entry structure

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A single entry handed to the sink by the logging front-end.
///
/// Entries are immutable and consumed once per write. The timestamp is
/// whatever the front-end stamped; the sink passes it through unmodified.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub error: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            error: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach an error value to the entry.
    pub fn with_error(mut self, error: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.error = Some(Arc::new(error));
        self
    }

    pub fn with_shared_error(
        mut self,
        error: Arc<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        self.error = Some(error);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = LogEntry::new(LogLevel::ERROR, "boom");
        assert_eq!(entry.level, LogLevel::ERROR);
        assert_eq!(entry.message, "boom");
        assert!(entry.error.is_none());
    }

    #[test]
    fn test_timestamp_passthrough() {
        let sentinel = DateTime::from_timestamp(1_500_000_000, 0).unwrap();
        let entry = LogEntry::new(LogLevel::INFO, "msg").with_timestamp(sentinel);
        assert_eq!(entry.timestamp, sentinel);
    }

    #[test]
    fn test_entry_with_error() {
        let err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let entry = LogEntry::new(LogLevel::ERROR, "read failed").with_error(err);
        assert!(entry.error.is_some());
    }
}
