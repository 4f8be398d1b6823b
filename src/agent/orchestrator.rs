//! Response orchestrator
//!
//! Coordinates one full exchange with the upstream model: system-prompt
//! assembly (persona + dossier + webhook capability), history conversion,
//! tool-set selection, the tool-call turn loop, and post-processing of the
//! result into a displayable message.
//!
//! The turn loop is deliberately bounded: one initial generation call and,
//! when the model requests tool invocations, exactly one follow-up call
//! after the results are appended. A model asking for further tool rounds
//! in the follow-up gets its text surfaced as-is.

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::agent::backend::{Content, GenerateRequest, GenerativeBackend, Part};
use crate::agent::prompts::{
    prepare_tts_text, webhook_block, COMPLETION_FALLBACK, PLACEHOLDER_REPLY,
    PROMPT_ENGINEER_INSTRUCTION, VISUAL_ACK,
};
use crate::config::{AgentConfig, DEFAULT_MODEL};
use crate::messages::{Attachment, GroundingCitation, Message, Role, ToolResult};
use crate::profile::ProfileStore;
use crate::terminal::LogSink;
use crate::tools::{declarations_for, ToolExecutor, ToolOutcome};
use crate::Result;

/// Everything one exchange produced.
#[derive(Debug, Default)]
struct ExchangeOutput {
    text: String,
    grounding: Vec<GroundingCitation>,
    generated_attachments: Vec<Attachment>,
    tool_result: Option<ToolResult>,
    audio_data: Option<String>,
}

pub struct Orchestrator {
    backend: Arc<dyn GenerativeBackend>,
    executor: ToolExecutor,
    profile: ProfileStore,
    log: LogSink,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn GenerativeBackend>, profile: ProfileStore, log: LogSink) -> Self {
        let executor = ToolExecutor::new(backend.clone(), profile.clone(), log.clone());
        Self {
            backend,
            executor,
            profile,
            log,
        }
    }

    /// Run one exchange and return the model's reply message.
    ///
    /// Any failure during the exchange is caught here, logged to the
    /// terminal stream, and surfaced as a single synthetic error message;
    /// the conversation continues.
    pub async fn respond(
        &self,
        prompt: &str,
        history: &[Message],
        attachments: &[Attachment],
        config: &AgentConfig,
    ) -> Message {
        match self.run_exchange(prompt, history, attachments, config).await {
            Ok(output) => {
                self.log.success("Output generated.");
                Message::model(output.text)
                    .with_attachments(output.generated_attachments)
                    .with_grounding(output.grounding)
                    .with_audio(output.audio_data)
                    .with_tool_result(output.tool_result)
            }
            Err(e) => {
                self.log.error(format!("ERROR: {e}"));
                error!("Exchange failed: {}", e);
                Message::model(format!("Error: {}", e.user_message()))
            }
        }
    }

    async fn run_exchange(
        &self,
        prompt: &str,
        history: &[Message],
        attachments: &[Attachment],
        config: &AgentConfig,
    ) -> Result<ExchangeOutput> {
        self.log.info(format!(
            "Neural Core: {} | Memory: {}",
            config.model_name,
            if config.use_memory { "ONLINE" } else { "OFFLINE" }
        ));

        let system_instruction = self.build_system_instruction(config);
        let mut contents = build_contents(history, prompt, attachments);
        let declarations = declarations_for(config);

        let request = GenerateRequest {
            model: config.model_name.clone(),
            system_instruction: system_instruction.clone(),
            contents: contents.clone(),
            function_declarations: declarations.clone(),
            use_search: config.use_search,
            temperature: config.effective_temperature(),
        };

        self.log.process("Thinking...");
        let mut response = self.backend.generate(request).await?;

        let mut outcome = ToolOutcome::default();
        if response.has_function_calls() {
            debug!("Model requested {} tool calls", response.function_calls.len());

            contents.push(Content::new(Role::Model, response.parts.clone()));

            let mut tool_parts = Vec::with_capacity(response.function_calls.len());
            for call in &response.function_calls {
                let result = self.executor.execute(call, config, &mut outcome).await;
                tool_parts.push(Part::FunctionResponse {
                    name: call.name.clone(),
                    response: json!({ "result": result }),
                });
            }
            contents.push(Content::new(Role::Tool, tool_parts));

            // One follow-up generation, never an iterative loop.
            response = self
                .backend
                .generate(GenerateRequest {
                    model: config.model_name.clone(),
                    system_instruction,
                    contents,
                    function_declarations: declarations,
                    use_search: config.use_search,
                    temperature: config.effective_temperature(),
                })
                .await?;
        }

        let mut text = response.text.clone();
        if text.trim().is_empty() || text.contains(PLACEHOLDER_REPLY) {
            // The model sometimes stays silent after tool work; make sure
            // the user still sees that something happened.
            text = if outcome.generated_attachments.is_empty() {
                COMPLETION_FALLBACK.to_string()
            } else {
                VISUAL_ACK.to_string()
            };
        }

        let audio_data = if config.enable_tts {
            self.synthesize_reply(&text, &config.voice_name).await
        } else {
            None
        };

        Ok(ExchangeOutput {
            text,
            grounding: response.grounding,
            generated_attachments: outcome.generated_attachments,
            tool_result: outcome.tool_result,
            audio_data,
        })
    }

    fn build_system_instruction(&self, config: &AgentConfig) -> String {
        let mut instruction = config.system_instruction.clone();

        if config.use_memory {
            let dossier = self.profile.dossier();
            if !dossier.is_empty() {
                instruction.push_str(&dossier);
                self.log.success("User Profile Loaded. Adapting personality...");
            }
        }

        if config.active_modules.webhook && config.webhook_config.is_configured() {
            instruction.push_str(&webhook_block(&config.webhook_config));
            self.log.info("Webhook Module: LINKED");
        }

        instruction
    }

    /// Synthesize speech for a reply. Failures degrade to text-only.
    async fn synthesize_reply(&self, text: &str, voice: &str) -> Option<String> {
        let cleaned = prepare_tts_text(text)?;
        match self.backend.synthesize(&cleaned, voice).await {
            Ok(audio) => audio,
            Err(e) => {
                info!("Speech synthesis failed, continuing without audio: {}", e);
                None
            }
        }
    }

    /// Rewrite raw input through the prompt-engineer persona.
    ///
    /// Returns None when the input is blank or the rewrite fails; callers
    /// keep the original text in that case.
    pub async fn enhance_prompt(&self, original: &str) -> Option<String> {
        if original.trim().is_empty() {
            return None;
        }

        let request = GenerateRequest {
            model: DEFAULT_MODEL.to_string(),
            system_instruction: PROMPT_ENGINEER_INSTRUCTION.to_string(),
            contents: vec![Content::new(Role::User, vec![Part::text(original)])],
            function_declarations: Vec::new(),
            use_search: false,
            temperature: 0.7,
        };

        match self.backend.generate(request).await {
            Ok(response) => {
                let trimmed = response.text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(e) => {
                info!("Prompt enhancement failed: {}", e);
                None
            }
        }
    }
}

/// Convert history plus the current turn into role-tagged part sequences.
///
/// System and tool messages never travel back upstream; text attachments
/// are inlined as labeled blocks, binary attachments as inline base64 data.
fn build_contents(history: &[Message], prompt: &str, attachments: &[Attachment]) -> Vec<Content> {
    let mut contents: Vec<Content> = history
        .iter()
        .filter(|msg| matches!(msg.role, Role::User | Role::Model))
        .map(|msg| {
            let mut parts = vec![Part::text(&msg.content)];
            for att in &msg.attachments {
                parts.push(attachment_part(att, false));
            }
            Content::new(msg.role, parts)
        })
        .collect();

    let mut current = vec![Part::text(prompt)];
    for att in attachments {
        current.push(attachment_part(att, true));
    }
    contents.push(Content::new(Role::User, current));

    contents
}

fn attachment_part(att: &Attachment, current_turn: bool) -> Part {
    if att.is_text {
        let label = if current_turn {
            format!("\n--- DATA STREAM: {} ---\n{}\n", att.name, att.data)
        } else {
            format!("\n[FILE: {}]\n{}\n", att.name, att.data)
        };
        Part::Text(label)
    } else {
        Part::InlineData {
            mime_type: att.mime_type.clone(),
            data: att.inline_data().to_string(),
        }
    }
}
