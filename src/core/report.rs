//! Report packet construction
//!
//! Turns a log entry plus its field context into the serializable payload
//! the transport delivers to the backend.

use super::field_context::{FieldContext, FieldValue};
use super::log_entry::LogEntry;
use super::severity::Severity;
use super::traced::TracedError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::error::Error;

/// Platform tag identifying the originating runtime family.
pub const PLATFORM: &str = "rust";

/// One stack frame of a report, oldest call site first in the trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub filename: String,
    pub function: String,
    pub module: String,
    pub lineno: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub abs_path: String,
}

/// Ordered stack trace attached to a report, oldest frame first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stacktrace {
    pub frames: Vec<Frame>,
}

/// The structured payload handed to the transport.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPacket {
    pub message: String,
    pub level: Severity,
    pub timestamp: DateTime<Utc>,
    pub platform: &'static str,
    pub extra: HashMap<String, FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<Stacktrace>,
}

impl ReportPacket {
    /// Serialize to the JSON form the transport posts.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Build a report packet from an entry and its resolved field context.
///
/// Pure function of its inputs: the entry's message and timestamp pass
/// through unmodified, the level is mapped to a backend severity, fields
/// become the packet's extra data. When the entry carries an error, the
/// `error` and `errorVerbose` extras are added and the first traced error
/// in the chain contributes the stack trace. An error without frame
/// information yields a packet without a stack trace.
pub fn build_report(entry: &LogEntry, fields: &FieldContext) -> ReportPacket {
    let mut extra: HashMap<String, FieldValue> = fields.fields().clone();
    let mut stacktrace = None;

    if let Some(error) = &entry.error {
        extra.insert("error".to_string(), FieldValue::from(error.to_string()));
        extra.insert(
            "errorVerbose".to_string(),
            FieldValue::from(verbose_form(error.as_ref())),
        );
        stacktrace = extract_stacktrace(error.as_ref());
    }

    ReportPacket {
        message: entry.message.clone(),
        level: Severity::from_level(entry.level),
        timestamp: entry.timestamp,
        platform: PLATFORM,
        extra,
        stacktrace,
    }
}

/// Fully-expanded display of an error: the traced form when available,
/// otherwise the causal chain one link per line.
fn verbose_form(error: &(dyn Error + Send + Sync + 'static)) -> String {
    if let Some(traced) = error.downcast_ref::<TracedError>() {
        return traced.verbose();
    }
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push('\n');
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Walk the error chain for the first traced error and convert its
/// recorded call sites into packet frames, oldest first.
fn extract_stacktrace(error: &(dyn Error + Send + Sync + 'static)) -> Option<Stacktrace> {
    let mut current: Option<&(dyn Error + 'static)> = Some(error);
    while let Some(err) = current {
        if let Some(traced) = err.downcast_ref::<TracedError>() {
            let mut frames: Vec<Frame> = traced
                .frames()
                .into_iter()
                .map(|frame| Frame {
                    filename: frame.filename,
                    function: frame.function,
                    module: frame.module,
                    lineno: frame.lineno,
                    abs_path: frame.abs_path.to_string_lossy().into_owned(),
                })
                .collect();
            if frames.is_empty() {
                return None;
            }
            // Recorded innermost first; the packet wants oldest first.
            frames.reverse();
            return Some(Stacktrace { frames });
        }
        current = err.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use std::io;

    #[test]
    fn test_build_passes_message_and_timestamp_through() {
        let sentinel = DateTime::from_timestamp(1_234_567_890, 0).unwrap();
        let entry = LogEntry::new(LogLevel::WARN, "slow request").with_timestamp(sentinel);
        let packet = build_report(&entry, &FieldContext::new());

        assert_eq!(packet.message, "slow request");
        assert_eq!(packet.timestamp, sentinel);
        assert_eq!(packet.level, Severity::Warning);
        assert_eq!(packet.platform, "rust");
        assert!(packet.extra.is_empty());
        assert!(packet.stacktrace.is_none());
    }

    #[test]
    fn test_build_carries_fields_as_extra() {
        let fields = FieldContext::new()
            .with_field("request_id", "abc-123")
            .with_field("attempt", 3);
        let entry = LogEntry::new(LogLevel::ERROR, "failed");
        let packet = build_report(&entry, &fields);

        assert_eq!(packet.extra.len(), 2);
        assert_eq!(
            packet.extra.get("request_id"),
            Some(&FieldValue::from("abc-123"))
        );
    }

    #[test]
    fn test_plain_error_has_extras_but_no_stacktrace() {
        let err = io::Error::new(io::ErrorKind::UnexpectedEof, "EOF");
        let entry = LogEntry::new(LogLevel::ERROR, "read failed").with_error(err);
        let packet = build_report(&entry, &FieldContext::new());

        assert_eq!(packet.extra.get("error"), Some(&FieldValue::from("EOF")));
        assert!(packet.extra.contains_key("errorVerbose"));
        assert!(packet.stacktrace.is_none());
    }

    #[test]
    fn test_traced_error_produces_stacktrace() {
        let err = TracedError::wrap(
            io::Error::new(io::ErrorKind::UnexpectedEof, "EOF"),
            "fifth error",
        );
        let entry = LogEntry::new(LogLevel::ERROR, "Log message").with_error(err);
        let packet = build_report(&entry, &FieldContext::new());

        assert_eq!(
            packet.extra.get("error"),
            Some(&FieldValue::from("fifth error: EOF"))
        );
        let trace = packet.stacktrace.expect("expected a stacktrace");
        assert!(trace.frames.len() >= 2);

        let innermost = trace.frames.last().unwrap();
        assert!(
            innermost.function.contains("test_traced_error_produces_stacktrace")
                || innermost.module.contains("test_traced_error_produces_stacktrace"),
            "unexpected innermost frame {}::{}",
            innermost.module,
            innermost.function
        );
    }

    #[test]
    fn test_packet_serialization_shape() {
        let entry = LogEntry::new(LogLevel::FATAL, "oh no");
        let fields = FieldContext::new().with_field("foo", "bar");
        let packet = build_report(&entry, &fields);

        let json: serde_json::Value = serde_json::from_str(&packet.to_json().unwrap()).unwrap();
        assert_eq!(json["message"], "oh no");
        assert_eq!(json["level"], "fatal");
        assert_eq!(json["platform"], "rust");
        assert_eq!(json["extra"]["foo"], "bar");
        assert!(json.get("stacktrace").is_none());
    }
}
