//! Speech recognition capability port
//!
//! The voice controller never touches a platform speech API directly. A
//! platform adapter implements `SpeechRecognizer` and feeds the controller
//! `RecognizerEvent`s; the controller only decides what should happen next.

use crate::Result;

/// Why a recognition session failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizerError {
    /// Microphone or service permission denied. Terminates listening
    /// permanently for the session.
    PermissionDenied,
    /// No speech detected before the platform timeout.
    NoSpeech,
    /// Transient network failure in the recognition service.
    Network,
    /// Session aborted by the platform.
    Aborted,
    /// Anything else the platform reports.
    Other,
}

impl RecognizerError {
    /// Permission failures disable voice input; everything else relies on
    /// the restart-on-end loop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RecognizerError::PermissionDenied)
    }
}

/// Events delivered by a recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerEvent {
    /// The session is live and capturing audio.
    Started,
    /// An interim hypothesis; may change before the final segment.
    Partial(String),
    /// A finalized transcript segment.
    Final(String),
    /// The session ended (normally or after an error).
    Ended,
    /// The session reported an error. `Ended` usually follows.
    Error(RecognizerError),
}

/// A platform speech-recognition session.
pub trait SpeechRecognizer: Send {
    /// Begin (or restart) a recognition session.
    fn start(&mut self) -> Result<()>;

    /// Request a graceful stop; the session will emit `Ended`.
    fn stop(&mut self) -> Result<()>;

    /// Tear the session down immediately, discarding buffered audio.
    fn abort(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_permission_errors_are_fatal() {
        assert!(RecognizerError::PermissionDenied.is_fatal());
        assert!(!RecognizerError::NoSpeech.is_fatal());
        assert!(!RecognizerError::Network.is_fatal());
        assert!(!RecognizerError::Aborted.is_fatal());
    }
}
