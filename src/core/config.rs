//! Sink configuration and construction

use super::error::Result;
use super::log_level::LogLevel;
use super::sink::Sink;
use crate::transport::{Dsn, HttpTransport, Transport};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Configuration for building a sink.
///
/// Deserializable so it can come straight out of a config file. `build`
/// validates the DSN by constructing the transport; nothing is returned
/// on failure — there is no degraded half-built sink.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Configuration {
    /// Destination identifier for the backend.
    pub dsn: String,
    /// Static tags (host name, data center, ...) attached by the
    /// transport to every report.
    #[serde(default)]
    pub tags: HashMap<String, String>,
    /// Release or version identifier.
    #[serde(default)]
    pub release: Option<String>,
    /// Deployment environment name.
    #[serde(default)]
    pub environment: Option<String>,
    /// Minimum enabled level.
    #[serde(default)]
    pub min_level: LogLevel,
}

impl Configuration {
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    #[must_use]
    pub fn with_min_level(mut self, min_level: LogLevel) -> Self {
        self.min_level = min_level;
        self
    }

    /// Build a sink wired to a fresh HTTP transport.
    ///
    /// Fails fast on an invalid DSN or unconstructable transport.
    pub fn build(self) -> Result<Sink> {
        let dsn: Dsn = self.dsn.parse()?;
        let mut transport = HttpTransport::new(dsn, self.tags)?;
        if let Some(release) = self.release {
            transport = transport.with_release(release);
        }
        if let Some(environment) = self.environment {
            transport = transport.with_environment(environment);
        }
        Ok(Sink::new(Arc::new(transport), self.min_level))
    }

    /// Build a sink around a caller-provided transport.
    ///
    /// The injection seam: a process constructs one root sink and passes
    /// it down explicitly instead of registering anything globally. The
    /// DSN is not consulted here; the transport already knows its
    /// destination.
    pub fn build_with_transport(self, transport: Arc<dyn Transport>) -> Sink {
        Sink::new(transport, self.min_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dsn_fails_build() {
        let result = Configuration::new("invalid").build();
        assert!(result.is_err(), "expected invalid DSN to fail the build");
    }

    #[test]
    fn test_builder_accumulates() {
        let config = Configuration::new("https://public@sentry.example.com/1")
            .with_tag("host", "web-1")
            .with_release("1.2.3")
            .with_environment("production")
            .with_min_level(LogLevel::WARN);

        assert_eq!(config.tags.get("host").map(String::as_str), Some("web-1"));
        assert_eq!(config.release.as_deref(), Some("1.2.3"));
        assert_eq!(config.min_level, LogLevel::WARN);
    }

    #[test]
    fn test_config_deserializes() {
        let config: Configuration = serde_json::from_str(
            r#"{
                "dsn": "https://public@sentry.example.com/1",
                "tags": {"host": "web-1"},
                "release": "1.2.3",
                "min_level": 2
            }"#,
        )
        .unwrap();

        assert_eq!(config.min_level, LogLevel::ERROR);
        assert_eq!(config.environment, None);
        assert_eq!(config.tags.len(), 1);
    }
}
