//! Error types for the sink

pub type Result<T> = std::result::Result<T, SinkError>;

/// Errors surfaced by the sink.
///
/// Only build-time configuration failures ever reach a caller; delivery
/// failures are absorbed at the sink boundary so logging can never crash
/// the application it instruments.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Invalid configuration with details
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Malformed destination identifier
    #[error("Invalid DSN '{dsn}': {message}")]
    InvalidDsn { dsn: String, message: String },

    /// Transport construction or delivery error
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SinkError {
    /// Create an invalid configuration error
    pub fn config(message: impl Into<String>) -> Self {
        SinkError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid DSN error
    pub fn invalid_dsn(dsn: impl Into<String>, message: impl Into<String>) -> Self {
        SinkError::InvalidDsn {
            dsn: dsn.into(),
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        SinkError::Transport(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SinkError::config("missing dsn");
        assert!(matches!(err, SinkError::Config { .. }));

        let err = SinkError::invalid_dsn("garbage", "relative URL without a base");
        assert!(matches!(err, SinkError::InvalidDsn { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = SinkError::invalid_dsn("garbage", "no scheme");
        assert_eq!(err.to_string(), "Invalid DSN 'garbage': no scheme");

        let err = SinkError::transport("queue closed");
        assert_eq!(err.to_string(), "Transport error: queue closed");
    }
}
