//! Side channel for rejected attack patterns.
//!
//! A sanitizer that empties its input reports why through a
//! [`SecuritySink`]. Signals carry the pattern name and the input length
//! only; the raw input never leaves the sanitizer.

use std::sync::{Mutex, PoisonError};

use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecuritySignal {
    /// Name of the attack pattern that matched.
    pub pattern: &'static str,
    /// Length of the rejected input, in bytes.
    pub input_len: usize,
}

/// Fire-and-forget receiver for security signals.
pub trait SecuritySink: Send + Sync {
    fn signal(&self, signal: &SecuritySignal);
}

/// Default sink: a `warn` event on the `koveo::security` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl SecuritySink for TracingSink {
    fn signal(&self, signal: &SecuritySignal) {
        warn!(
            target: "koveo::security",
            pattern = signal.pattern,
            input_len = signal.input_len,
            "potentially malicious input rejected"
        );
    }
}

/// Keeps every signal in memory. Useful for tests and for batching
/// signals into an external telemetry pipeline.
#[derive(Debug, Default)]
pub struct MemorySink {
    signals: Mutex<Vec<SecuritySignal>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the recorded signals.
    pub fn drain(&self) -> Vec<SecuritySignal> {
        let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *signals)
    }

    pub fn len(&self) -> usize {
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecuritySink for MemorySink {
    fn signal(&self, signal: &SecuritySignal) {
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(signal.clone());
    }
}
