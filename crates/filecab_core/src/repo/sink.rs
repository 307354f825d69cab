//! Injected diagnostics sink for per-file failures in bulk reads.
//!
//! # Responsibility
//! - Give the engine a logging capability that callers can replace.
//!
//! # Invariants
//! - Sinks receive free-text messages only; they never influence control
//!   flow of the operation that reported the failure.

use log::error;
use std::sync::Mutex;

/// Receives diagnostics for files skipped during bulk reads.
pub trait ErrorSink: Send + Sync {
    fn log_error(&self, message: &str);
}

/// Default sink forwarding every message to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn log_error(&self, message: &str) {
        error!("{message}");
    }
}

/// Sink that retains messages in memory.
///
/// Used by tests and by embedders that want to inspect which files a bulk
/// read skipped.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all messages received so far.
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ErrorSink for CollectingSink {
    fn log_error(&self, message: &str) {
        match self.messages.lock() {
            Ok(mut guard) => guard.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CollectingSink, ErrorSink};

    #[test]
    fn collecting_sink_retains_messages_in_order() {
        let sink = CollectingSink::new();
        sink.log_error("first");
        sink.log_error("second");

        assert_eq!(sink.messages(), vec!["first", "second"]);
    }
}
