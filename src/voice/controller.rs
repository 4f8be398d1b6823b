//! Voice input controller
//!
//! A deterministic state machine over the speech-recognition port: silence
//! based auto-send, command interception, continuous-mode restarts, and a
//! re-entrancy lock around sends. All timing flows through explicit
//! `Instant` values passed into the transition methods, so the machine is
//! fully testable without a clock, a timer thread, or a platform speech
//! API.
//!
//! The controller performs no I/O. Every transition returns `VoiceEffect`s
//! describing what the embedding application should do: start or stop the
//! recognizer, dispatch a message, toggle media panels.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::messages::Attachment;
use crate::voice::commands::{CommandAction, CommandTable, InputSource};
use crate::voice::recognizer::{RecognizerEvent, RecognizerError};

/// Timing parameters for the controller.
#[derive(Clone, Debug)]
pub struct VoiceConfig {
    /// Silence after the last recognized segment before auto-send fires.
    pub silence_window: Duration,
    /// Delay before restarting a continuous session after it ends.
    pub restart_delay: Duration,
    /// Re-entrancy lock after an auto or voice-command send.
    pub auto_send_lock: Duration,
    /// Re-entrancy lock after a manual send.
    pub manual_send_lock: Duration,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            silence_window: Duration::from_millis(2000),
            restart_delay: Duration::from_millis(150),
            auto_send_lock: Duration::from_millis(800),
            manual_send_lock: Duration::from_millis(500),
        }
    }
}

impl VoiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the silence window
    pub fn with_silence_window(mut self, window: Duration) -> Self {
        self.silence_window = window;
        self
    }

    /// Set the restart delay
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    /// Set the auto-send lock duration
    pub fn with_auto_send_lock(mut self, lock: Duration) -> Self {
        self.auto_send_lock = lock;
        self
    }

    /// Set the manual-send lock duration
    pub fn with_manual_send_lock(mut self, lock: Duration) -> Self {
        self.manual_send_lock = lock;
        self
    }
}

/// Listening phase of the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListenState {
    /// Not listening.
    #[default]
    Idle,
    /// A recognition session is live.
    Listening,
}

impl ListenState {
    pub fn is_listening(&self) -> bool {
        matches!(self, ListenState::Listening)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ListenState::Idle)
    }
}

/// Side effects requested by a controller transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoiceEffect {
    /// Start (or restart) the recognition session.
    StartRecognition,
    /// Stop the recognition session gracefully.
    StopRecognition,
    /// Dispatch the pending input as a user message.
    Send {
        text: String,
        attachments: Vec<Attachment>,
    },
    CameraOn,
    CameraOff,
    ScreenShareOn,
    OpenTerminal,
}

/// Voice input state machine.
pub struct VoiceController {
    config: VoiceConfig,
    commands: CommandTable,

    state: ListenState,
    /// Monotonic intent flag: the session keeps restarting while this is
    /// set. Checked again at the restart deadline so a stop that raced the
    /// timer wins.
    keep_listening: bool,

    pending_input: String,
    attachments: Vec<Attachment>,

    silence_deadline: Option<Instant>,
    restart_at: Option<Instant>,
    send_lock_until: Option<Instant>,

    /// Mirror of the app's request-in-flight flag; sends and recognition
    /// results are suppressed while set.
    loading: bool,

    camera_active: bool,
    screen_share_active: bool,
    terminal_open: bool,
}

impl VoiceController {
    pub fn new(config: VoiceConfig) -> Self {
        Self {
            config,
            commands: CommandTable::default(),
            state: ListenState::Idle,
            keep_listening: false,
            pending_input: String::new(),
            attachments: Vec::new(),
            silence_deadline: None,
            restart_at: None,
            send_lock_until: None,
            loading: false,
            camera_active: false,
            screen_share_active: false,
            terminal_open: false,
        }
    }

    /// Replace the command table (rules are evaluated in order).
    pub fn with_commands(mut self, commands: CommandTable) -> Self {
        self.commands = commands;
        self
    }

    // === Accessors ===

    pub fn state(&self) -> ListenState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state.is_listening()
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn is_send_locked(&self, now: Instant) -> bool {
        self.send_lock_until.map_or(false, |until| now < until)
    }

    // === App state mirrors ===

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    pub fn push_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn remove_attachment(&mut self, index: usize) {
        if index < self.attachments.len() {
            self.attachments.remove(index);
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_camera_active(&mut self, active: bool) {
        self.camera_active = active;
    }

    pub fn set_screen_share_active(&mut self, active: bool) {
        self.screen_share_active = active;
    }

    pub fn set_terminal_open(&mut self, open: bool) {
        self.terminal_open = open;
    }

    // === Transitions ===

    /// Manual microphone toggle.
    pub fn toggle_voice(&mut self, _now: Instant) -> Vec<VoiceEffect> {
        if self.state.is_listening() || self.keep_listening {
            debug!("Voice toggle: stopping");
            self.keep_listening = false;
            self.state = ListenState::Idle;
            self.silence_deadline = None;
            self.restart_at = None;
            vec![VoiceEffect::StopRecognition]
        } else {
            debug!("Voice toggle: starting");
            self.keep_listening = true;
            vec![VoiceEffect::StartRecognition]
        }
    }

    /// Handle an event from the recognition session.
    pub fn on_event(&mut self, event: RecognizerEvent, now: Instant) -> Vec<VoiceEffect> {
        match event {
            RecognizerEvent::Started => {
                self.state = ListenState::Listening;
                Vec::new()
            }
            RecognizerEvent::Partial(_) => {
                if self.is_send_locked(now) || self.loading {
                    self.silence_deadline = None;
                } else if self.state.is_listening() {
                    // Interim speech counts against silence too.
                    self.silence_deadline = Some(now + self.config.silence_window);
                }
                Vec::new()
            }
            RecognizerEvent::Final(text) => self.on_final_segment(&text, now),
            RecognizerEvent::Ended => {
                if self.keep_listening {
                    // Break the synchronous restart loop; re-checked at the
                    // deadline in case the user stopped meanwhile.
                    debug!("Recognition ended, scheduling restart");
                    self.restart_at = Some(now + self.config.restart_delay);
                } else {
                    self.state = ListenState::Idle;
                    self.silence_deadline = None;
                }
                Vec::new()
            }
            RecognizerEvent::Error(err) => {
                if err.is_fatal() {
                    debug!("Fatal recognizer error {:?}, disabling voice input", err);
                    self.keep_listening = false;
                    self.state = ListenState::Idle;
                    self.silence_deadline = None;
                    self.restart_at = None;
                }
                // Transient errors fall through to the restart-on-end loop.
                Vec::new()
            }
        }
    }

    fn on_final_segment(&mut self, text: &str, now: Instant) -> Vec<VoiceEffect> {
        // Results arriving during or just after a send are stale
        // recognition buffers; dropping them keeps the cleared input box
        // from repopulating.
        if self.is_send_locked(now) || self.loading {
            self.silence_deadline = None;
            return Vec::new();
        }

        self.silence_deadline = None;

        let mut effects = Vec::new();
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            match self.commands.match_input(trimmed, InputSource::Voice) {
                Some(action) => {
                    debug!("Voice command intercepted: {:?}", action);
                    effects.extend(self.run_command(action, now));
                }
                None => self.append_transcript(trimmed),
            }
        }

        // A send above arms the lock; don't schedule an auto-send behind it.
        if !self.is_send_locked(now) {
            self.silence_deadline = Some(now + self.config.silence_window);
        }
        effects
    }

    /// Append a final transcript to the pending input, suppressing
    /// idempotent re-delivery of an already-appended suffix.
    fn append_transcript(&mut self, segment: &str) {
        if self.pending_input.ends_with(segment) {
            return;
        }
        if !self.pending_input.is_empty() {
            self.pending_input.push(' ');
        }
        self.pending_input.push_str(segment);
    }

    fn run_command(&mut self, action: CommandAction, now: Instant) -> Vec<VoiceEffect> {
        match action {
            CommandAction::StartContinuous => {
                self.keep_listening = true;
                if self.state.is_idle() {
                    vec![VoiceEffect::StartRecognition]
                } else {
                    Vec::new()
                }
            }
            CommandAction::CameraOn => {
                if !self.camera_active {
                    vec![VoiceEffect::CameraOn]
                } else {
                    Vec::new()
                }
            }
            CommandAction::CameraOff => {
                if self.camera_active {
                    vec![VoiceEffect::CameraOff]
                } else {
                    Vec::new()
                }
            }
            CommandAction::ScreenShareOn => {
                if !self.screen_share_active {
                    vec![VoiceEffect::ScreenShareOn]
                } else {
                    Vec::new()
                }
            }
            CommandAction::OpenTerminal => {
                if !self.terminal_open {
                    vec![VoiceEffect::OpenTerminal]
                } else {
                    Vec::new()
                }
            }
            CommandAction::SendNow => self.trigger_auto_send(now),
        }
    }

    /// Check timer deadlines. Call this periodically (or whenever the
    /// embedding event loop ticks); `now` drives every decision.
    pub fn poll(&mut self, now: Instant) -> Vec<VoiceEffect> {
        let mut effects = Vec::new();

        if let Some(at) = self.restart_at {
            if now >= at {
                self.restart_at = None;
                // Intent may have flipped while the delay ran.
                if self.keep_listening {
                    effects.push(VoiceEffect::StartRecognition);
                }
            }
        }

        if let Some(deadline) = self.silence_deadline {
            if now >= deadline {
                self.silence_deadline = None;
                effects.extend(self.trigger_auto_send(now));
            }
        }

        effects
    }

    /// Silence-triggered (or voice-commanded) send.
    fn trigger_auto_send(&mut self, now: Instant) -> Vec<VoiceEffect> {
        if self.is_send_locked(now) || self.loading {
            return Vec::new();
        }

        let text = self.pending_input.trim().to_string();
        if text.is_empty() && self.attachments.is_empty() {
            return Vec::new();
        }

        self.send_lock_until = Some(now + self.config.auto_send_lock);
        self.pending_input.clear();
        self.silence_deadline = None;
        let attachments = std::mem::take(&mut self.attachments);

        debug!("Auto-send: {} chars, {} attachments", text.len(), attachments.len());
        vec![VoiceEffect::Send { text, attachments }]
    }

    /// Manual send (send button / Enter key). Checks text commands first;
    /// a matched command consumes the input without dispatching a message.
    pub fn manual_send(&mut self, now: Instant) -> Vec<VoiceEffect> {
        if self.is_send_locked(now) || self.loading {
            return Vec::new();
        }

        let text = self.pending_input.trim().to_string();
        if text.is_empty() && self.attachments.is_empty() {
            return Vec::new();
        }

        if let Some(action) = self.commands.match_input(&text, InputSource::Text) {
            debug!("Text command intercepted: {:?}", action);
            self.pending_input.clear();
            self.send_lock_until = Some(now + self.config.manual_send_lock);
            return self.run_command_unlocked(action, now);
        }

        self.send_lock_until = Some(now + self.config.manual_send_lock);
        self.pending_input.clear();
        self.silence_deadline = None;
        let attachments = std::mem::take(&mut self.attachments);

        vec![VoiceEffect::Send { text, attachments }]
    }

    /// Run a text command that was matched while the lock for this very
    /// send was already armed. `SendNow` bypasses the fresh lock so an
    /// explicit send still goes out.
    fn run_command_unlocked(&mut self, action: CommandAction, now: Instant) -> Vec<VoiceEffect> {
        if action == CommandAction::SendNow {
            self.send_lock_until = None;
            return self.trigger_auto_send(now);
        }
        self.run_command(action, now)
    }
}

impl Default for VoiceController {
    fn default() -> Self {
        Self::new(VoiceConfig::default())
    }
}
