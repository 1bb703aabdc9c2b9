//! Transport boundary for report delivery
//!
//! A `Transport` accepts report packets for asynchronous delivery to the
//! backend. One transport instance is shared by every sink derived from a
//! root, so implementations must tolerate concurrent `capture` calls.

pub mod dsn;
pub mod http;

pub use dsn::Dsn;
pub use http::HttpTransport;

use crate::core::report::ReportPacket;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::Arc;

/// Static tags reserved for the transport's own global context.
///
/// Per-call-site fields never travel here; they belong in the packet's
/// extra data.
pub type TagMap = HashMap<String, String>;

/// Delivery mechanism to the error-tracking backend.
pub trait Transport: Send + Sync {
    /// Accept a packet for delivery. Returns the assigned event id and a
    /// signal that fires once this packet's delivery attempt has finished,
    /// whether it succeeded or not.
    fn capture(&self, packet: ReportPacket, tags: &TagMap) -> (String, CompletionSignal);

    /// Block until every packet accepted before this call has had its
    /// delivery attempt. Must not block on captures submitted afterwards.
    fn wait(&self);
}

struct SignalState {
    done: Mutex<bool>,
    cond: Condvar,
}

/// Blocking handle for one capture's delivery attempt.
#[derive(Clone)]
pub struct CompletionSignal {
    inner: Arc<SignalState>,
}

impl CompletionSignal {
    /// A signal that has not fired yet.
    pub fn pending() -> Self {
        Self {
            inner: Arc::new(SignalState {
                done: Mutex::new(false),
                cond: Condvar::new(),
            }),
        }
    }

    /// An already-fired signal, for transports that deliver inline.
    pub fn ready() -> Self {
        Self {
            inner: Arc::new(SignalState {
                done: Mutex::new(true),
                cond: Condvar::new(),
            }),
        }
    }

    /// Fire the signal, waking every waiter.
    pub fn complete(&self) {
        let mut done = self.inner.done.lock();
        *done = true;
        self.inner.cond.notify_all();
    }

    /// Block until the signal fires. No timeout: a delivery that never
    /// finishes keeps the caller parked.
    pub fn wait(&self) {
        let mut done = self.inner.done.lock();
        while !*done {
            self.inner.cond.wait(&mut done);
        }
    }

    pub fn is_complete(&self) -> bool {
        *self.inner.done.lock()
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::pending()
    }
}
