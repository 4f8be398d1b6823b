//! Tool execution
//!
//! Dispatches the model's function calls against stub or real backends.
//! Every call produces a textual result that is fed back to the model;
//! failures become error text, never an `Err`, so the model can explain
//! them in natural language. Visual side products accumulate in a
//! `ToolOutcome` alongside the last UI artifact.

use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::agent::backend::{FunctionCall, GenerativeBackend};
use crate::config::AgentConfig;
use crate::messages::{Attachment, ToolResult};
use crate::profile::{ProfileAction, ProfileStore};
use crate::terminal::LogSink;
use crate::tools::declarations::*;
use crate::tools::links::{calendar_event_url, drive_create_url, DriveDocKind};
use crate::tools::ssh::simulate_command;

/// Fetched page content is capped at this many characters.
const FETCH_CAP: usize = 25_000;

/// Side products of a tool round.
#[derive(Debug, Default)]
pub struct ToolOutcome {
    /// Attachments generated during the round (canvas renders, images).
    pub generated_attachments: Vec<Attachment>,
    /// UI artifact of the round; last writer wins.
    pub tool_result: Option<ToolResult>,
}

pub struct ToolExecutor {
    backend: Arc<dyn GenerativeBackend>,
    profile: ProfileStore,
    http: reqwest::Client,
    log: LogSink,
}

impl ToolExecutor {
    pub fn new(backend: Arc<dyn GenerativeBackend>, profile: ProfileStore, log: LogSink) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            backend,
            profile,
            http,
            log,
        }
    }

    /// Execute one function call; returns the textual result for the model.
    pub async fn execute(
        &self,
        call: &FunctionCall,
        config: &AgentConfig,
        outcome: &mut ToolOutcome,
    ) -> String {
        debug!("Executing tool call: {}", call.name);
        let args = &call.args;

        match call.name.as_str() {
            BROWSER_TOOL | SCRAPE_TOOL => {
                let url = str_arg(args, "url");
                self.log.process(format!("Fetching Node: {url}"));
                self.fetch_url(url).await
            }
            MEMORY_TOOL => {
                let category = str_arg(args, "category");
                let info = str_arg(args, "info");
                let action =
                    ProfileAction::parse(str_arg(args, "action")).unwrap_or(ProfileAction::Add);
                self.log.success(format!("Learning: [{category}] {info}"));
                self.profile.update(category, info, action)
            }
            CANVAS_TOOL => {
                let mime = str_arg(args, "type");
                let title = str_arg(args, "title");
                self.log.process(format!("Rendering: {title}"));
                outcome.generated_attachments.push(Attachment {
                    name: title.to_string(),
                    mime_type: mime.to_string(),
                    data: str_arg(args, "content").to_string(),
                    is_text: mime != "image/svg+xml",
                });
                "Visual content rendered.".to_string()
            }
            CALENDAR_TOOL => {
                let title = str_arg(args, "title");
                self.log.success(format!("Scheduling: {title}"));
                let url = calendar_event_url(
                    title,
                    str_arg(args, "startDateTime"),
                    str_arg(args, "endDateTime"),
                    opt_str_arg(args, "details"),
                    opt_str_arg(args, "location"),
                );
                outcome.tool_result = Some(ToolResult::IntentLink {
                    url: url.clone(),
                    title: title.to_string(),
                });
                format!("Intent link created: {url}")
            }
            DRIVE_TOOL => {
                let kind = DriveDocKind::parse(str_arg(args, "type"));
                self.log
                    .success(format!("Drive Allocator: New {}", str_arg(args, "type")));
                let url = drive_create_url(kind);
                let title = opt_str_arg(args, "title").unwrap_or("Document");
                outcome.tool_result = Some(ToolResult::IntentLink {
                    url: url.clone(),
                    title: format!("New {title}"),
                });
                format!("Drive link created: {url}")
            }
            SSH_TOOL => {
                let command = str_arg(args, "command");
                self.log.warning(format!("SSH Exec: {command}"));
                let output = simulate_command(command);
                outcome.tool_result = Some(ToolResult::SshTerminal {
                    command: command.to_string(),
                    output: output.clone(),
                });
                format!("STDOUT: {output}")
            }
            MODEL3D_TOOL => {
                self.log.process("3D Engine: Generating Geometry...");
                outcome.tool_result = Some(ToolResult::SceneModel {
                    code: str_arg(args, "code").to_string(),
                    description: str_arg(args, "description").to_string(),
                });
                "3D Code generated and sent to frontend renderer.".to_string()
            }
            WEBHOOK_TOOL => {
                let payload = args.get("data").cloned().unwrap_or(Value::Null);
                self.log.process("Webhook Uplink: Sending Payload...");
                let response = self
                    .post_webhook(&config.webhook_config.url, &payload)
                    .await;
                self.log.success("Webhook Response: Received");
                outcome.tool_result = Some(ToolResult::WebhookCall {
                    payload: payload.to_string(),
                    response: response.clone(),
                    url: config.webhook_config.url.clone(),
                });
                format!("WEBHOOK RESPONSE: {response}")
            }
            IMAGE_TOOL => {
                let prompt = str_arg(args, "prompt");
                self.log
                    .process(format!("Visual Core: Generating Image for \"{prompt}\""));
                match self.backend.render_image(prompt).await {
                    Ok(Some(image)) => {
                        self.log.success("Visual Core: Image Generated");
                        outcome.generated_attachments.push(Attachment::binary(
                            format!("generated_image_{}.png", Utc::now().timestamp_millis()),
                            image.mime_type,
                            image.base64,
                        ));
                        "Image generated successfully. Inform the user.".to_string()
                    }
                    Ok(None) | Err(_) => {
                        self.log.error("Visual Core: Generation Failed");
                        "Error: Failed to generate image. The model might not be available or \
                         the prompt was rejected. Inform the user about this failure."
                            .to_string()
                    }
                }
            }
            other => format!("Error: unknown tool \"{other}\""),
        }
    }

    /// Read a URL through the reader proxy, capped and error-tolerant.
    async fn fetch_url(&self, url: &str) -> String {
        let reader_url = format!("https://r.jina.ai/{url}");
        match self.http.get(&reader_url).send().await {
            Ok(response) => {
                let ok = response.status().is_success();
                let text = response.text().await.unwrap_or_default();
                if !ok || text.contains("Error") {
                    return "Error: Could not retrieve content.".to_string();
                }
                text.chars().take(FETCH_CAP).collect()
            }
            Err(e) => format!("Error accessing node: {e}"),
        }
    }

    async fn post_webhook(&self, url: &str, payload: &Value) -> String {
        let result = self.http.post(url).json(payload).send().await;
        match result {
            Ok(response) => {
                let text = response.text().await.unwrap_or_default();
                // Pretty-print JSON replies for cleaner output.
                match serde_json::from_str::<Value>(&text) {
                    Ok(json) => serde_json::to_string_pretty(&json).unwrap_or(text),
                    Err(_) => text,
                }
            }
            Err(e) => format!("Webhook Error: {e}"),
        }
    }
}

fn str_arg<'a>(args: &'a Value, key: &str) -> &'a str {
    args.get(key).and_then(Value::as_str).unwrap_or("")
}

fn opt_str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::backend::{GenerateRequest, GenerateResponse, GeneratedImage};
    use crate::storage::MemoryStorage;
    use crate::Result;
    use async_trait::async_trait;
    use serde_json::json;

    /// Backend stub: image generation succeeds or fails on demand.
    struct StubBackend {
        image: Option<GeneratedImage>,
    }

    #[async_trait]
    impl GenerativeBackend for StubBackend {
        async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
            Ok(GenerateResponse::default())
        }

        async fn synthesize(&self, _text: &str, _voice: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn render_image(&self, _prompt: &str) -> Result<Option<GeneratedImage>> {
            Ok(self.image.clone())
        }
    }

    fn executor(image: Option<GeneratedImage>) -> ToolExecutor {
        ToolExecutor::new(
            Arc::new(StubBackend { image }),
            ProfileStore::new(Arc::new(MemoryStorage::new())),
            LogSink::disconnected(),
        )
    }

    fn call(name: &str, args: Value) -> FunctionCall {
        FunctionCall {
            name: name.to_string(),
            args,
        }
    }

    #[tokio::test]
    async fn test_ssh_call_produces_terminal_artifact() {
        let executor = executor(None);
        let mut outcome = ToolOutcome::default();
        let result = executor
            .execute(
                &call(SSH_TOOL, json!({"command": "pwd", "reasoning": "check cwd"})),
                &AgentConfig::default(),
                &mut outcome,
            )
            .await;
        assert_eq!(result, "STDOUT: /home/probotics/workspace");
        assert!(matches!(
            outcome.tool_result,
            Some(ToolResult::SshTerminal { .. })
        ));
    }

    #[tokio::test]
    async fn test_calendar_call_builds_intent_link() {
        let executor = executor(None);
        let mut outcome = ToolOutcome::default();
        let result = executor
            .execute(
                &call(
                    CALENDAR_TOOL,
                    json!({
                        "title": "Sync",
                        "startDateTime": "20260810T100000Z",
                        "endDateTime": "20260810T110000Z"
                    }),
                ),
                &AgentConfig::default(),
                &mut outcome,
            )
            .await;
        assert!(result.starts_with("Intent link created: https://calendar.google.com"));
        match outcome.tool_result {
            Some(ToolResult::IntentLink { title, .. }) => assert_eq!(title, "Sync"),
            other => panic!("Expected IntentLink, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_canvas_call_records_attachment() {
        let executor = executor(None);
        let mut outcome = ToolOutcome::default();
        let result = executor
            .execute(
                &call(
                    CANVAS_TOOL,
                    json!({"type": "image/svg+xml", "content": "<svg/>", "title": "Chart"}),
                ),
                &AgentConfig::default(),
                &mut outcome,
            )
            .await;
        assert_eq!(result, "Visual content rendered.");
        assert_eq!(outcome.generated_attachments.len(), 1);
        let att = &outcome.generated_attachments[0];
        assert_eq!(att.name, "Chart");
        assert!(!att.is_text);
    }

    #[tokio::test]
    async fn test_canvas_html_is_text() {
        let executor = executor(None);
        let mut outcome = ToolOutcome::default();
        executor
            .execute(
                &call(
                    CANVAS_TOOL,
                    json!({"type": "text/html", "content": "<p>hi</p>", "title": "Page"}),
                ),
                &AgentConfig::default(),
                &mut outcome,
            )
            .await;
        assert!(outcome.generated_attachments[0].is_text);
    }

    #[tokio::test]
    async fn test_memory_call_updates_profile() {
        let storage = Arc::new(MemoryStorage::new());
        let profile = ProfileStore::new(storage);
        let executor = ToolExecutor::new(
            Arc::new(StubBackend { image: None }),
            profile.clone(),
            LogSink::disconnected(),
        );
        let mut outcome = ToolOutcome::default();
        let result = executor
            .execute(
                &call(
                    MEMORY_TOOL,
                    json!({"category": "technicalSkills", "info": "Rust", "action": "ADD"}),
                ),
                &AgentConfig::default(),
                &mut outcome,
            )
            .await;
        assert!(result.contains("Profile updated"));
        assert_eq!(profile.load().technical_skills, vec!["Rust"]);
    }

    #[tokio::test]
    async fn test_image_failure_result_explains() {
        let executor = executor(None);
        let mut outcome = ToolOutcome::default();
        let result = executor
            .execute(
                &call(IMAGE_TOOL, json!({"prompt": "a fox"})),
                &AgentConfig::default(),
                &mut outcome,
            )
            .await;
        assert!(result.starts_with("Error: Failed to generate image"));
        assert!(outcome.generated_attachments.is_empty());
    }

    #[tokio::test]
    async fn test_image_success_pushes_attachment() {
        let executor = executor(Some(GeneratedImage {
            base64: "AAAA".into(),
            mime_type: "image/png".into(),
        }));
        let mut outcome = ToolOutcome::default();
        let result = executor
            .execute(
                &call(IMAGE_TOOL, json!({"prompt": "a fox"})),
                &AgentConfig::default(),
                &mut outcome,
            )
            .await;
        assert!(result.contains("Image generated successfully"));
        assert_eq!(outcome.generated_attachments.len(), 1);
        assert!(outcome.generated_attachments[0]
            .name
            .starts_with("generated_image_"));
    }

    #[tokio::test]
    async fn test_model3d_artifact() {
        let executor = executor(None);
        let mut outcome = ToolOutcome::default();
        let result = executor
            .execute(
                &call(
                    MODEL3D_TOOL,
                    json!({"description": "a cube", "code": "scene.add(cube);"}),
                ),
                &AgentConfig::default(),
                &mut outcome,
            )
            .await;
        assert!(result.contains("3D Code generated"));
        assert!(matches!(
            outcome.tool_result,
            Some(ToolResult::SceneModel { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_text() {
        let executor = executor(None);
        let mut outcome = ToolOutcome::default();
        let result = executor
            .execute(
                &call("time_travel", json!({})),
                &AgentConfig::default(),
                &mut outcome,
            )
            .await;
        assert!(result.starts_with("Error: unknown tool"));
    }
}
