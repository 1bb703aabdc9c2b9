//! Sink core
//!
//! Implements the check/write protocol the logging front-end drives. A
//! sink owns its field context and shares one transport with every sink
//! derived from the same root.

use super::field_context::{FieldContext, FieldValue};
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::report::build_report;
use crate::transport::{TagMap, Transport};
use std::sync::Arc;

pub struct Sink {
    transport: Arc<dyn Transport>,
    fields: FieldContext,
    min_level: LogLevel,
}

impl Sink {
    pub(crate) fn new(transport: Arc<dyn Transport>, min_level: LogLevel) -> Self {
        Self {
            transport,
            fields: FieldContext::new(),
            min_level,
        }
    }

    /// Whether an entry at this level would be written.
    ///
    /// Pure predicate: no packet is built and nothing is sent. Callable
    /// any number of times independently of `write`.
    pub fn check(&self, entry: &LogEntry) -> bool {
        entry.level >= self.min_level
    }

    /// Derive a child sink whose field context is this sink's plus
    /// `additional` (additional wins on key collision). The receiver and
    /// any sibling are unaffected; the child shares the transport.
    #[must_use]
    pub fn with_fields<I, K, V>(&self, additional: I) -> Sink
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Sink {
            transport: Arc::clone(&self.transport),
            fields: self.fields.derive(additional),
            min_level: self.min_level,
        }
    }

    /// Build a report for an enabled entry and hand it to the transport.
    ///
    /// `fields` are this call's extra fields; they join the sink's own
    /// context in the packet's extra data. The tag map passed to the
    /// transport stays empty — tags are the transport's global context,
    /// never per-call-site data.
    ///
    /// Fatal-tier severities block until the transport has finished this
    /// packet's delivery attempt and drained its queue, so a caller about
    /// to terminate the process cannot outrun the report. There is no
    /// timeout on that wait. Transport failures are never surfaced here.
    pub fn write<I, K, V>(&self, entry: &LogEntry, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let view = self.fields.derive(fields);
        let packet = build_report(entry, &view);
        let severity = packet.level;

        let (_id, done) = self.transport.capture(packet, &TagMap::new());

        if severity.is_fatal() {
            done.wait();
            self.transport.wait();
        }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn fields(&self) -> &FieldContext {
        &self.fields
    }
}

impl Clone for Sink {
    fn clone(&self) -> Self {
        Sink {
            transport: Arc::clone(&self.transport),
            fields: self.fields.clone(),
            min_level: self.min_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::ReportPacket;
    use crate::transport::CompletionSignal;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        packets: Mutex<Vec<ReportPacket>>,
        waits: Mutex<usize>,
    }

    impl Transport for RecordingTransport {
        fn capture(&self, packet: ReportPacket, tags: &TagMap) -> (String, CompletionSignal) {
            assert!(tags.is_empty(), "capture must not receive per-call tags");
            self.packets.lock().push(packet);
            (String::new(), CompletionSignal::ready())
        }

        fn wait(&self) {
            *self.waits.lock() += 1;
        }
    }

    fn sink_with(min_level: LogLevel) -> (Sink, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let sink = Sink::new(Arc::clone(&transport) as Arc<dyn Transport>, min_level);
        (sink, transport)
    }

    #[test]
    fn test_check_gates_on_min_level() {
        let (sink, _) = sink_with(LogLevel::ERROR);
        assert!(!sink.check(&LogEntry::new(LogLevel::default(), "")));
        assert!(sink.check(&LogEntry::new(LogLevel::ERROR, "")));
        assert!(sink.check(&LogEntry::new(LogLevel::PANIC, "")));
    }

    #[test]
    fn test_write_below_fatal_does_not_wait() {
        let (sink, transport) = sink_with(LogLevel::ERROR);
        let entry = LogEntry::new(LogLevel::ERROR, "recoverable");
        sink.write(&entry, [("k", "v")]);

        assert_eq!(transport.packets.lock().len(), 1);
        assert_eq!(*transport.waits.lock(), 0);
    }

    #[test]
    fn test_fatal_write_flushes_before_returning() {
        let (sink, transport) = sink_with(LogLevel::ERROR);
        let entry = LogEntry::new(LogLevel::PANIC, "oh no");
        sink.write(&entry, std::iter::empty::<(String, FieldValue)>());

        assert_eq!(transport.packets.lock().len(), 1);
        assert_eq!(*transport.waits.lock(), 1);
    }

    #[test]
    fn test_child_fields_reach_packet_extra() {
        let (sink, transport) = sink_with(LogLevel::ERROR);
        let child = sink.with_fields([("component", "ingest")]);
        let entry = LogEntry::new(LogLevel::ERROR, "boom");
        child.write(&entry, [("request_id", "r-1")]);

        let packets = transport.packets.lock();
        let extra = &packets[0].extra;
        assert_eq!(extra.get("component"), Some(&FieldValue::from("ingest")));
        assert_eq!(extra.get("request_id"), Some(&FieldValue::from("r-1")));
        // Per-call fields never leak back into the sink.
        assert!(child.fields().fields().get("request_id").is_none());
    }
}
