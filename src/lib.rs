//! # Sentry Sink
//!
//! A structured-logging sink that bridges a leveled logging front-end to a
//! Sentry-compatible error-tracking backend.
//!
//! ## Features
//!
//! - **Severity Mapping**: Total translation of front-end levels to
//!   backend severities
//! - **Inheritable Fields**: Copy-on-derive field contexts, safe across
//!   sibling loggers
//! - **Crash Safety**: Fatal-tier writes flush synchronously before the
//!   process is allowed to die
//! - **Best Effort**: Delivery failures never reach the instrumented
//!   application

pub mod core;
pub mod transport;

pub mod prelude {
    pub use crate::core::{
        build_report, CallFrame, Configuration, FieldContext, FieldValue, Frame, LogEntry,
        LogLevel, ReportPacket, Result, Severity, Sink, SinkError, Stacktrace, TracedError,
        PLATFORM,
    };
    pub use crate::transport::{CompletionSignal, Dsn, HttpTransport, TagMap, Transport};
}

pub use crate::core::{
    build_report, CallFrame, Configuration, FieldContext, FieldValue, Frame, LogEntry, LogLevel,
    ReportPacket, Result, Severity, Sink, SinkError, Stacktrace, TracedError, PLATFORM,
};
pub use crate::transport::{CompletionSignal, Dsn, HttpTransport, TagMap, Transport};
