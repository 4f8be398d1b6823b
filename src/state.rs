//! Shared application state
//!
//! Single source of truth for the front-end shell: media panel activation,
//! request-in-flight flag, and the active configuration. The orchestration
//! layer writes it; the UI and tests read it through `SharedAppState`.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::AgentConfig;
use crate::voice::VoiceEffect;

#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// A generation request is in flight.
    pub loading: bool,
    pub camera_active: bool,
    pub screen_share_active: bool,
    pub terminal_open: bool,
    pub chat_open: bool,
    /// Active agent configuration; replaced wholesale on change.
    pub config: AgentConfig,
    /// Current error, surfaced once in the UI.
    pub error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn toggle_camera(&mut self) {
        self.camera_active = !self.camera_active;
    }

    pub fn toggle_screen_share(&mut self) {
        self.screen_share_active = !self.screen_share_active;
    }

    pub fn toggle_terminal(&mut self) {
        self.terminal_open = !self.terminal_open;
    }

    /// Apply a voice-controller effect to the panel state. Send and
    /// recognition effects are handled elsewhere.
    pub fn apply_voice_effect(&mut self, effect: &VoiceEffect) {
        match effect {
            VoiceEffect::CameraOn => self.camera_active = true,
            VoiceEffect::CameraOff => self.camera_active = false,
            VoiceEffect::ScreenShareOn => self.screen_share_active = true,
            VoiceEffect::OpenTerminal => self.terminal_open = true,
            VoiceEffect::StartRecognition
            | VoiceEffect::StopRecognition
            | VoiceEffect::Send { .. } => {}
        }
    }
}

/// Thread-safe shared application state.
#[derive(Clone)]
pub struct SharedAppState {
    inner: Arc<RwLock<AppState>>,
}

impl Default for SharedAppState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedAppState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppState::new())),
        }
    }

    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, AppState> {
        self.inner.read()
    }

    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, AppState> {
        self.inner.write()
    }

    // === Convenience read methods ===

    pub fn is_loading(&self) -> bool {
        self.inner.read().loading
    }

    pub fn is_camera_active(&self) -> bool {
        self.inner.read().camera_active
    }

    pub fn is_screen_share_active(&self) -> bool {
        self.inner.read().screen_share_active
    }

    pub fn is_terminal_open(&self) -> bool {
        self.inner.read().terminal_open
    }

    pub fn config(&self) -> AgentConfig {
        self.inner.read().config.clone()
    }

    /// Replace the configuration wholesale.
    pub fn set_config(&self, config: AgentConfig) {
        self.inner.write().config = config;
    }
}
