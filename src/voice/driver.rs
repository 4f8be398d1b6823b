//! Voice session driver
//!
//! Binds a `VoiceController` to a concrete `SpeechRecognizer`. Recognition
//! effects are applied to the recognizer here; application-level effects
//! (sends, media toggles) are returned for the embedding app to handle.

use std::time::Instant;

use tracing::warn;

use crate::voice::controller::{VoiceController, VoiceEffect};
use crate::voice::recognizer::{RecognizerEvent, SpeechRecognizer};

pub struct VoiceSession {
    controller: VoiceController,
    recognizer: Box<dyn SpeechRecognizer>,
}

impl VoiceSession {
    pub fn new(controller: VoiceController, recognizer: Box<dyn SpeechRecognizer>) -> Self {
        Self {
            controller,
            recognizer,
        }
    }

    pub fn controller(&self) -> &VoiceController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut VoiceController {
        &mut self.controller
    }

    /// Toggle the microphone; returns app-level effects.
    pub fn toggle(&mut self, now: Instant) -> Vec<VoiceEffect> {
        let effects = self.controller.toggle_voice(now);
        self.apply(effects)
    }

    /// Feed a recognizer event through the controller.
    pub fn on_event(&mut self, event: RecognizerEvent, now: Instant) -> Vec<VoiceEffect> {
        let effects = self.controller.on_event(event, now);
        self.apply(effects)
    }

    /// Drive timer deadlines.
    pub fn poll(&mut self, now: Instant) -> Vec<VoiceEffect> {
        let effects = self.controller.poll(now);
        self.apply(effects)
    }

    /// Manual send from the input box.
    pub fn manual_send(&mut self, now: Instant) -> Vec<VoiceEffect> {
        let effects = self.controller.manual_send(now);
        self.apply(effects)
    }

    /// Execute recognition effects against the session; pass the rest up.
    fn apply(&mut self, effects: Vec<VoiceEffect>) -> Vec<VoiceEffect> {
        let mut remaining = Vec::new();
        for effect in effects {
            match effect {
                VoiceEffect::StartRecognition => {
                    if let Err(e) = self.recognizer.start() {
                        warn!("Recognizer start failed: {}", e);
                    }
                }
                VoiceEffect::StopRecognition => {
                    if let Err(e) = self.recognizer.stop() {
                        warn!("Recognizer stop failed: {}", e);
                    }
                }
                other => remaining.push(other),
            }
        }
        remaining
    }
}
