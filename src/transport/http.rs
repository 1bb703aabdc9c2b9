//! Default HTTP transport
//!
//! Delivers report packets to the backend's store endpoint from a single
//! worker thread fed by a bounded queue. A full queue drops the packet
//! rather than block the logging call path.

use super::{CompletionSignal, TagMap, Transport};
use crate::core::error::{Result, SinkError};
use crate::core::report::ReportPacket;
use crate::transport::dsn::Dsn;
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const QUEUE_CAPACITY: usize = 256;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

struct Job {
    body: String,
    signal: CompletionSignal,
}

#[derive(Default)]
struct DeliveryLedger {
    submitted: u64,
    completed: u64,
}

struct DeliveryState {
    ledger: Mutex<DeliveryLedger>,
    cond: Condvar,
}

/// Transport posting JSON-serialized packets to the DSN's store endpoint.
pub struct HttpTransport {
    dsn: Dsn,
    tags: TagMap,
    release: Option<String>,
    environment: Option<String>,
    sender: Option<Sender<Job>>,
    state: Arc<DeliveryState>,
    sequence: AtomicU64,
    worker: Option<thread::JoinHandle<()>>,
}

impl HttpTransport {
    /// Connect a transport to the given DSN. Fails if the HTTP client
    /// cannot be constructed.
    pub fn new(dsn: Dsn, tags: TagMap) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SinkError::transport(e.to_string()))?;

        let (sender, receiver) = bounded::<Job>(QUEUE_CAPACITY);
        let state = Arc::new(DeliveryState {
            ledger: Mutex::new(DeliveryLedger::default()),
            cond: Condvar::new(),
        });

        let store_url = dsn.store_url();
        let auth_header = dsn.auth_header();
        let worker_state = Arc::clone(&state);

        let worker = thread::spawn(move || {
            for job in receiver {
                // Best effort: a failed post is not retried and not
                // reported back to the logging path.
                let _ = client
                    .post(&store_url)
                    .header("X-Sentry-Auth", &auth_header)
                    .header("Content-Type", "application/json")
                    .body(job.body)
                    .send();

                job.signal.complete();
                let mut ledger = worker_state.ledger.lock();
                ledger.completed += 1;
                worker_state.cond.notify_all();
            }
        });

        Ok(Self {
            dsn,
            tags,
            release: None,
            environment: None,
            sender: Some(sender),
            state,
            sequence: AtomicU64::new(0),
            worker: Some(worker),
        })
    }

    /// Attach a release identifier to every delivered report.
    #[must_use]
    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    /// Attach an environment name to every delivered report.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn dsn(&self) -> &Dsn {
        &self.dsn
    }

    fn next_event_id(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let stamp = chrono::Utc::now().timestamp_micros() as u64;
        format!("{:016x}{:016x}", stamp, seq)
    }

    /// Serialize a packet together with the transport's own context.
    fn payload(&self, packet: &ReportPacket, event_id: &str) -> Result<String> {
        let mut payload = serde_json::to_value(packet)?;
        payload["event_id"] = serde_json::Value::String(event_id.to_string());
        payload["project"] = serde_json::Value::String(self.dsn.project_id().to_string());
        if !self.tags.is_empty() {
            payload["tags"] = serde_json::to_value(&self.tags)?;
        }
        if let Some(release) = &self.release {
            payload["release"] = serde_json::Value::String(release.clone());
        }
        if let Some(environment) = &self.environment {
            payload["environment"] = serde_json::Value::String(environment.clone());
        }
        serde_json::to_string(&payload).map_err(SinkError::from)
    }
}

impl Transport for HttpTransport {
    fn capture(&self, packet: ReportPacket, _tags: &TagMap) -> (String, CompletionSignal) {
        let event_id = self.next_event_id();
        let signal = CompletionSignal::pending();

        let body = match self.payload(&packet, &event_id) {
            Ok(body) => body,
            Err(_) => {
                // Unserializable packet: nothing to deliver.
                signal.complete();
                return (event_id, signal);
            }
        };

        let sender = match &self.sender {
            Some(sender) => sender,
            None => {
                signal.complete();
                return (event_id, signal);
            }
        };

        {
            let mut ledger = self.state.ledger.lock();
            ledger.submitted += 1;
        }

        let job = Job {
            body,
            signal: signal.clone(),
        };
        if let Err(TrySendError::Full(job) | TrySendError::Disconnected(job)) =
            sender.try_send(job)
        {
            // Queue saturated: drop the report rather than block logging.
            job.signal.complete();
            let mut ledger = self.state.ledger.lock();
            ledger.completed += 1;
            self.state.cond.notify_all();
        }

        (event_id, signal)
    }

    fn wait(&self) {
        let mut ledger = self.state.ledger.lock();
        let target = ledger.submitted;
        while ledger.completed < target {
            self.state.cond.wait(&mut ledger);
        }
    }
}

impl Drop for HttpTransport {
    fn drop(&mut self) {
        // Closing the queue lets the worker drain and exit.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
