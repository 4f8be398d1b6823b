//! Voice input
//!
//! Continuous speech capture with silence-based auto-send and command
//! interception. The state machine in `controller` is pure and clock
//! injected; `recognizer` is the platform capability port; `driver` wires
//! the two together.

pub mod commands;
pub mod controller;
pub mod driver;
pub mod recognizer;

pub use commands::{CommandAction, CommandRule, CommandTable, InputSource};
pub use controller::{ListenState, VoiceConfig, VoiceController, VoiceEffect};
pub use driver::VoiceSession;
pub use recognizer::{RecognizerError, RecognizerEvent, SpeechRecognizer};
