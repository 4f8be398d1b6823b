use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Conversation role, serialized to the wire names the upstream API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    System,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
            Role::System => "system",
            Role::Tool => "tool",
        }
    }
}

/// A file attached to a message. Base64 payload for binary data,
/// raw text content for documents. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub data: String,
    pub is_text: bool,
}

impl Attachment {
    pub fn text(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
            is_text: true,
        }
    }

    pub fn binary(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
            is_text: false,
        }
    }

    /// Build a binary attachment from raw bytes (file upload path).
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: &[u8],
    ) -> Self {
        Self::binary(name, mime_type, BASE64.encode(bytes))
    }

    /// Base64 payload with any data-URL prefix stripped, ready for upload.
    pub fn inline_data(&self) -> &str {
        match self.data.find("base64,") {
            Some(idx) => &self.data[idx + "base64,".len()..],
            None => &self.data,
        }
    }

    /// Decode the binary payload. None for text attachments or payloads
    /// that are not valid base64.
    pub fn decode_bytes(&self) -> Option<Vec<u8>> {
        if self.is_text {
            return None;
        }
        BASE64.decode(self.inline_data()).ok()
    }
}

/// Typed artifact produced by a tool call, rendered by the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolResult {
    SshTerminal {
        command: String,
        output: String,
    },
    IntentLink {
        url: String,
        title: String,
    },
    SceneModel {
        code: String,
        description: String,
    },
    WebhookCall {
        payload: String,
        response: String,
        url: String,
    },
}

/// A source URL/title pair returned alongside a search-grounded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingCitation {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grounding: Vec<GroundingCitation>,
    /// Base64 raw audio payload from speech synthesis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolResult>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            attachments: Vec::new(),
            grounding: Vec::new(),
            audio_data: None,
            tool_result: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self::new(Role::Model, content)
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn with_grounding(mut self, grounding: Vec<GroundingCitation>) -> Self {
        self.grounding = grounding;
        self
    }

    pub fn with_audio(mut self, audio: Option<String>) -> Self {
        self.audio_data = audio;
        self
    }

    pub fn with_tool_result(mut self, result: Option<ToolResult>) -> Self {
        self.tool_result = result;
        self
    }
}
