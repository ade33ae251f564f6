//! Host state shared between the stdin reader, request workers and the
//! notification forwarder.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use chameleon_core::{Dispatcher, MethodResponse};
use serde::Serialize;

pub struct BridgeState {
    /// The dispatcher. Wrapped in `Arc` so blocking workers can hold it.
    pub dispatcher: Arc<Dispatcher>,
    /// Calls that reached the dispatcher.
    pub calls_total: AtomicUsize,
    /// Calls answered with an error response.
    pub calls_failed: AtomicUsize,
    /// Calls naming an unknown method.
    pub calls_not_implemented: AtomicUsize,
    /// Input lines that could not be parsed as a frame.
    pub frames_malformed: AtomicUsize,
    /// Notifications written to the frontend.
    pub notifications_forwarded: AtomicUsize,
    /// Notifications skipped because the forwarder lagged behind.
    pub notifications_lagged: AtomicUsize,
}

impl BridgeState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            calls_total: AtomicUsize::new(0),
            calls_failed: AtomicUsize::new(0),
            calls_not_implemented: AtomicUsize::new(0),
            frames_malformed: AtomicUsize::new(0),
            notifications_forwarded: AtomicUsize::new(0),
            notifications_lagged: AtomicUsize::new(0),
        }
    }

    pub fn record_response(&self, response: &MethodResponse) {
        self.calls_total.fetch_add(1, Ordering::Relaxed);
        match response {
            MethodResponse::Success { .. } => {}
            MethodResponse::Error(_) => {
                self.calls_failed.fetch_add(1, Ordering::Relaxed);
            }
            MethodResponse::NotImplemented => {
                self.calls_not_implemented.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn diagnostics_snapshot(&self) -> BridgeDiagnostics {
        BridgeDiagnostics {
            calls_total: self.calls_total.load(Ordering::Relaxed),
            calls_failed: self.calls_failed.load(Ordering::Relaxed),
            calls_not_implemented: self.calls_not_implemented.load(Ordering::Relaxed),
            frames_malformed: self.frames_malformed.load(Ordering::Relaxed),
            notifications_forwarded: self.notifications_forwarded.load(Ordering::Relaxed),
            notifications_lagged: self.notifications_lagged.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeDiagnostics {
    pub calls_total: usize,
    pub calls_failed: usize,
    pub calls_not_implemented: usize,
    pub frames_malformed: usize,
    pub notifications_forwarded: usize,
    pub notifications_lagged: usize,
}
