//! Error types for the Probotics core
//!
//! One crate-wide error enum with a recoverability classification and
//! user-facing messages for the terminal log.

use thiserror::Error;

/// Probotics core errors
#[derive(Error, Debug, Clone)]
pub enum ProboticsError {
    /// Missing or invalid API credentials
    #[error("Credentials error: {0}")]
    CredentialsError(String),

    /// Upstream generation call failure (network or model)
    #[error("Generation error: {0}")]
    GenerationError(String),

    /// Text-to-speech synthesis error
    #[error("Speech synthesis error: {0}")]
    SynthesisError(String),

    /// Speech recognition session error
    #[error("Recognition error: {0}")]
    RecognitionError(String),

    /// Tool execution error
    #[error("Tool error: {0}")]
    ToolError(String),

    /// Persistence layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Channel communication error
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// File system I/O error
    #[error("IO error: {0}")]
    IOError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for ProboticsError {
    fn from(e: std::io::Error) -> Self {
        ProboticsError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for ProboticsError {
    fn from(e: serde_json::Error) -> Self {
        ProboticsError::StorageError(e.to_string())
    }
}

impl ProboticsError {
    /// Check if this error is recoverable
    ///
    /// Recoverable errors allow the conversation to continue,
    /// while non-recoverable errors require user intervention.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Missing credentials are fatal, surfaced once
            ProboticsError::CredentialsError(_) => false,
            // Upstream failures are reported per call, conversation continues
            ProboticsError::GenerationError(_) => true,
            // TTS failure degrades to text-only output
            ProboticsError::SynthesisError(_) => true,
            // Recognition errors are handled by the restart loop
            ProboticsError::RecognitionError(_) => true,
            // Tool failures are fed back to the model as text
            ProboticsError::ToolError(_) => true,
            // Storage errors may require user intervention
            ProboticsError::StorageError(_) => false,
            // Channel errors indicate internal issues
            ProboticsError::ChannelError(_) => false,
            // IO errors may require user intervention
            ProboticsError::IOError(_) => false,
            // Config errors require user intervention
            ProboticsError::ConfigError(_) => false,
        }
    }

    /// Get a user-friendly description of the error
    ///
    /// Returns a message suitable for display in the terminal log.
    pub fn user_message(&self) -> String {
        match self {
            ProboticsError::CredentialsError(_) => {
                "API key is missing or invalid. Please check your credentials.".to_string()
            }
            ProboticsError::GenerationError(_) => {
                "AI response generation failed. Please try again.".to_string()
            }
            ProboticsError::SynthesisError(_) => {
                "Speech synthesis failed. Response will be shown as text.".to_string()
            }
            ProboticsError::RecognitionError(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            ProboticsError::ToolError(_) => {
                "A tool call failed. The assistant has been notified.".to_string()
            }
            ProboticsError::StorageError(_) => {
                "Failed to read or write saved data.".to_string()
            }
            ProboticsError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            ProboticsError::IOError(_) => "File system error occurred.".to_string(),
            ProboticsError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
        }
    }
}

/// Result type alias for Probotics operations
pub type Result<T> = std::result::Result<T, ProboticsError>;
