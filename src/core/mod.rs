//! Core sink types

pub mod config;
pub mod error;
pub mod field_context;
pub mod log_entry;
pub mod log_level;
pub mod report;
pub mod severity;
pub mod sink;
pub mod traced;

pub use config::Configuration;
pub use error::{Result, SinkError};
pub use field_context::{FieldContext, FieldValue};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use report::{build_report, Frame, ReportPacket, Stacktrace, PLATFORM};
pub use severity::Severity;
pub use sink::Sink;
pub use traced::{CallFrame, TracedError};
