//! Terminal log stream
//!
//! The UI-visible execution log. The orchestrator and tool executor emit
//! records through a `LogSink`; the front-end drains the receiver side.

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Process,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalLog {
    pub id: Uuid,
    pub message: String,
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
}

impl TerminalLog {
    pub fn new(message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            level,
            timestamp: Utc::now(),
        }
    }
}

/// Sender half of the terminal log stream.
///
/// Cheap to clone; a sink built with `disconnected()` swallows every record
/// so library code never has to special-case "no UI attached".
#[derive(Clone)]
pub struct LogSink {
    tx: Option<Sender<TerminalLog>>,
}

impl LogSink {
    /// Create a connected sink and the receiver to drain it.
    pub fn channel(capacity: usize) -> (Self, Receiver<TerminalLog>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink with no receiver; every record is dropped.
    pub fn disconnected() -> Self {
        Self { tx: None }
    }

    pub fn log(&self, message: impl Into<String>, level: LogLevel) {
        if let Some(tx) = &self.tx {
            // A full or disconnected receiver must never stall the exchange.
            let _ = tx.try_send(TerminalLog::new(message, level));
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(message, LogLevel::Info);
    }

    pub fn process(&self, message: impl Into<String>) {
        self.log(message, LogLevel::Process);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.log(message, LogLevel::Success);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(message, LogLevel::Warning);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(message, LogLevel::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_delivers_in_order() {
        let (sink, rx) = LogSink::channel(16);
        sink.info("first");
        sink.process("second");
        sink.error("third");

        assert_eq!(rx.try_recv().unwrap().message, "first");
        let second = rx.try_recv().unwrap();
        assert_eq!(second.level, LogLevel::Process);
        assert_eq!(rx.try_recv().unwrap().level, LogLevel::Error);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_disconnected_sink_swallows() {
        let sink = LogSink::disconnected();
        sink.info("nobody hears this");
    }

    #[test]
    fn test_full_channel_does_not_block() {
        let (sink, _rx) = LogSink::channel(1);
        sink.info("one");
        // Second send would block on a bounded channel; try_send drops it.
        sink.info("two");
    }
}
