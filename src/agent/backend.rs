//! Generative backend port
//!
//! The orchestrator talks to the upstream AI through this trait: one text
//! generation operation, one speech synthesis operation, one image
//! rendering operation. `GeminiClient` is the production implementation;
//! tests substitute a scripted mock.

use async_trait::async_trait;
use serde_json::Value;

use crate::messages::{GroundingCitation, Role};
use crate::Result;

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Value,
}

/// One piece of a content turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    /// Base64 payload with its MIME type.
    InlineData { mime_type: String, data: String },
    FunctionCall(FunctionCall),
    FunctionResponse { name: String, response: Value },
}

impl Part {
    pub fn text(content: impl Into<String>) -> Self {
        Part::Text(content.into())
    }
}

/// A role-tagged sequence of parts.
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }
}

/// Everything one generation call needs.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub system_instruction: String,
    pub contents: Vec<Content>,
    /// JSON-schema function declarations offered to the model.
    pub function_declarations: Vec<Value>,
    /// Offer the built-in web-search capability.
    pub use_search: bool,
    pub temperature: f32,
}

/// Normalized generation result.
#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    /// Concatenated text parts of the first candidate.
    pub text: String,
    /// Raw parts of the model turn, echoed back verbatim on the tool
    /// follow-up call.
    pub parts: Vec<Part>,
    /// Tool invocations requested by the model, in order.
    pub function_calls: Vec<FunctionCall>,
    /// Search grounding citations, if any.
    pub grounding: Vec<GroundingCitation>,
}

impl GenerateResponse {
    pub fn has_function_calls(&self) -> bool {
        !self.function_calls.is_empty()
    }
}

/// An image produced by the image model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub base64: String,
    pub mime_type: String,
}

/// The upstream AI API surface used by the orchestrator.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// One text-generation call.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Synthesize speech; returns base64 raw audio, or None when the
    /// service produced nothing.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Option<String>>;

    /// Generate an image from a prompt; None when the model declined.
    async fn render_image(&self, prompt: &str) -> Result<Option<GeneratedImage>>;
}
