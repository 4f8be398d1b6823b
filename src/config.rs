//! Agent configuration
//!
//! Configuration for the response orchestrator: persona, model selection,
//! enabled tool modules, sampling, and speech output. Configs are replaced
//! wholesale, never patched field by field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::prompts::{DEFAULT_SYSTEM_INSTRUCTION, HELP_SYSTEM_INSTRUCTION};

/// Default generation model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default synthesis voice.
pub const DEFAULT_VOICE: &str = "Kore";

/// Per-module enablement toggles for the tool surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    pub browser: bool,
    pub memory: bool,
    pub scraper: bool,
    pub calendar: bool,
    pub drive: bool,
    pub ssh: bool,
    pub model3d: bool,
    pub canvas: bool,
    pub webhook: bool,
    pub image_gen: bool,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            browser: true,
            memory: true,
            scraper: true,
            calendar: true,
            drive: true,
            ssh: true,
            model3d: true,
            canvas: true,
            webhook: false,
            image_gen: true,
        }
    }
}

impl ModuleConfig {
    /// Config with every module switched off.
    pub fn none() -> Self {
        Self {
            browser: false,
            memory: false,
            scraper: false,
            calendar: false,
            drive: false,
            ssh: false,
            model3d: false,
            canvas: false,
            webhook: false,
            image_gen: false,
        }
    }

    pub fn active_count(&self) -> usize {
        [
            self.browser,
            self.memory,
            self.scraper,
            self.calendar,
            self.drive,
            self.ssh,
            self.model3d,
            self.canvas,
            self.webhook,
            self.image_gen,
        ]
        .iter()
        .filter(|on| **on)
        .count()
    }
}

/// Webhook relay target and free-text routing instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
    pub description: String,
}

impl WebhookConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Full agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// Persona text injected as the system instruction
    pub system_instruction: String,
    /// Generation model identifier
    pub model_name: String,
    /// Enable the web-search capability alongside function tools
    pub use_search: bool,
    /// Inject the user dossier into the system prompt
    pub use_memory: bool,
    /// Granular tool module toggles
    pub active_modules: ModuleConfig,
    /// Webhook relay configuration
    pub webhook_config: WebhookConfig,
    /// Force low-temperature analytical sampling
    pub use_deep_analysis: bool,
    /// Synthesize speech for model replies
    pub enable_tts: bool,
    /// Synthesis voice name
    pub voice_name: String,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            use_search: true,
            use_memory: true,
            active_modules: ModuleConfig::default(),
            webhook_config: WebhookConfig::default(),
            use_deep_analysis: false,
            enable_tts: true,
            voice_name: DEFAULT_VOICE.to_string(),
            temperature: 0.7,
        }
    }
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for the in-app support assistant: no tools, no
    /// memory, a calmer temperature, and its own voice.
    pub fn help_assistant() -> Self {
        Self {
            system_instruction: HELP_SYSTEM_INSTRUCTION.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            use_search: false,
            use_memory: false,
            active_modules: ModuleConfig::none(),
            webhook_config: WebhookConfig::default(),
            use_deep_analysis: false,
            enable_tts: false,
            voice_name: "Puck".to_string(),
            temperature: 0.5,
        }
    }

    /// Set the persona text
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Set the generation model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = model.into();
        self
    }

    /// Set the module toggles
    pub fn with_modules(mut self, modules: ModuleConfig) -> Self {
        self.active_modules = modules;
        self
    }

    /// Set the webhook target
    pub fn with_webhook(mut self, webhook: WebhookConfig) -> Self {
        self.webhook_config = webhook;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Enable or disable speech output
    pub fn with_tts(mut self, enable: bool) -> Self {
        self.enable_tts = enable;
        self
    }

    /// Effective sampling temperature: deep analysis pins it low.
    pub fn effective_temperature(&self) -> f32 {
        if self.use_deep_analysis {
            0.2
        } else {
            self.temperature
        }
    }
}

/// A named configuration in the identity library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgent {
    pub id: Uuid,
    pub name: String,
    pub config: AgentConfig,
    pub created_at: DateTime<Utc>,
}

impl SavedAgent {
    pub fn new(name: impl Into<String>, config: AgentConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            config,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.model_name, DEFAULT_MODEL);
        assert_eq!(config.voice_name, DEFAULT_VOICE);
        assert!(config.use_search);
        assert!(config.use_memory);
        assert!(config.enable_tts);
        assert!(!config.active_modules.webhook);
        assert!(config.active_modules.image_gen);
    }

    #[test]
    fn test_help_assistant_preset() {
        let config = AgentConfig::help_assistant();
        assert_eq!(config.active_modules.active_count(), 0);
        assert!(!config.use_memory);
        assert!(!config.use_search);
        assert_eq!(config.voice_name, "Puck");
    }

    #[test]
    fn test_config_builder() {
        let config = AgentConfig::new()
            .with_model("gemini-2.5-pro")
            .with_temperature(0.3)
            .with_tts(false);
        assert_eq!(config.model_name, "gemini-2.5-pro");
        assert_eq!(config.temperature, 0.3);
        assert!(!config.enable_tts);
    }

    #[test]
    fn test_deep_analysis_pins_temperature() {
        let mut config = AgentConfig::default().with_temperature(0.9);
        assert_eq!(config.effective_temperature(), 0.9);
        config.use_deep_analysis = true;
        assert_eq!(config.effective_temperature(), 0.2);
    }

    #[test]
    fn test_module_counts() {
        assert_eq!(ModuleConfig::none().active_count(), 0);
        assert_eq!(ModuleConfig::default().active_count(), 9);
    }

    #[test]
    fn test_webhook_configured() {
        assert!(!WebhookConfig::default().is_configured());
        let hook = WebhookConfig {
            url: "https://hooks.example/flow".into(),
            description: String::new(),
        };
        assert!(hook.is_configured());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = AgentConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AgentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.model_name, config.model_name);
        assert_eq!(back.active_modules, config.active_modules);
    }
}
