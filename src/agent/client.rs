//! Gemini API client
//!
//! HTTP implementation of the generative backend over
//! `generativelanguage.googleapis.com`. All payload shaping follows the
//! upstream contract; no wire format is owned here. Every call carries
//! permissive safety thresholds. Without them the image model silently
//! blocks prompts like "soldier".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::agent::backend::{
    Content, FunctionCall, GeneratedImage, GenerateRequest, GenerateResponse, GenerativeBackend,
    Part,
};
use crate::messages::{GroundingCitation, Role};
use crate::{ProboticsError, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

const TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

// --- Wire format (upstream contract) ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent>,
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    safety_settings: Vec<SafetySetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct WireContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<WirePart>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<WireInlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<WireFunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<WireFunctionResponse>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Serialize, Deserialize)]
struct WireFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

fn permissive_safety() -> Vec<SafetySetting> {
    const CATEGORIES: [&str; 4] = [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ];
    CATEGORIES
        .iter()
        .map(|category| SafetySetting {
            category,
            threshold: "BLOCK_NONE",
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    content: Option<WireContent>,
    grounding_metadata: Option<WireGroundingMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<WireGroundingChunk>,
}

#[derive(Deserialize)]
struct WireGroundingChunk {
    web: Option<WireWebSource>,
}

#[derive(Deserialize)]
struct WireWebSource {
    #[serde(default)]
    title: String,
    #[serde(default)]
    uri: String,
}

// --- Client ---

/// Gemini API client. Credentials are validated at construction; a missing
/// key is fatal and surfaced once.
pub struct GeminiClient {
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client using the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(API_KEY_VAR)
            .map_err(|_| ProboticsError::CredentialsError(format!("{API_KEY_VAR} is not set")))?;
        Self::new(key)
    }

    /// Create a client with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ProboticsError::CredentialsError("API key is empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Ok(Self { api_key, client })
    }

    async fn post_generate(&self, model: &str, body: &WireRequest) -> Result<WireResponse> {
        let url = format!("{API_BASE}/models/{model}:generateContent");
        debug!("POST {}", url);

        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ProboticsError::GenerationError(format!("request failed: {e}")))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ProboticsError::GenerationError(format!(
                "API error {status}: {text}"
            )));
        }

        res.json()
            .await
            .map_err(|e| ProboticsError::GenerationError(format!("response parse failed: {e}")))
    }
}

fn to_wire_part(part: &Part) -> WirePart {
    match part {
        Part::Text(text) => WirePart {
            text: Some(text.clone()),
            ..Default::default()
        },
        Part::InlineData { mime_type, data } => WirePart {
            inline_data: Some(WireInlineData {
                mime_type: mime_type.clone(),
                data: data.clone(),
            }),
            ..Default::default()
        },
        Part::FunctionCall(call) => WirePart {
            function_call: Some(WireFunctionCall {
                name: call.name.clone(),
                args: call.args.clone(),
            }),
            ..Default::default()
        },
        Part::FunctionResponse { name, response } => WirePart {
            function_response: Some(WireFunctionResponse {
                name: name.clone(),
                response: response.clone(),
            }),
            ..Default::default()
        },
    }
}

fn to_wire_content(content: &Content) -> WireContent {
    WireContent {
        role: Some(content.role.as_str().to_string()),
        parts: content.parts.iter().map(to_wire_part).collect(),
    }
}

fn from_wire_part(part: WirePart) -> Option<Part> {
    if let Some(text) = part.text {
        return Some(Part::Text(text));
    }
    if let Some(inline) = part.inline_data {
        return Some(Part::InlineData {
            mime_type: inline.mime_type,
            data: inline.data,
        });
    }
    if let Some(call) = part.function_call {
        return Some(Part::FunctionCall(FunctionCall {
            name: call.name,
            args: call.args,
        }));
    }
    if let Some(resp) = part.function_response {
        return Some(Part::FunctionResponse {
            name: resp.name,
            response: resp.response,
        });
    }
    None
}

fn normalize_response(wire: WireResponse) -> GenerateResponse {
    let mut response = GenerateResponse::default();

    let Some(candidate) = wire.candidates.into_iter().next() else {
        return response;
    };

    if let Some(content) = candidate.content {
        for part in content.parts {
            if let Some(part) = from_wire_part(part) {
                match &part {
                    Part::Text(text) => response.text.push_str(text),
                    Part::FunctionCall(call) => response.function_calls.push(call.clone()),
                    _ => {}
                }
                response.parts.push(part);
            }
        }
    }

    if let Some(metadata) = candidate.grounding_metadata {
        for chunk in metadata.grounding_chunks {
            if let Some(web) = chunk.web {
                response.grounding.push(GroundingCitation {
                    title: web.title,
                    uri: web.uri,
                });
            }
        }
    }

    response
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let mut tools = Vec::new();
        if !request.function_declarations.is_empty() {
            tools.push(serde_json::json!({
                "functionDeclarations": request.function_declarations,
            }));
        }
        if request.use_search {
            tools.push(serde_json::json!({ "googleSearch": {} }));
        }

        let body = WireRequest {
            system_instruction: Some(WireContent {
                role: None,
                parts: vec![WirePart {
                    text: Some(request.system_instruction.clone()),
                    ..Default::default()
                }],
            }),
            contents: request.contents.iter().map(to_wire_content).collect(),
            tools,
            safety_settings: permissive_safety(),
            generation_config: Some(serde_json::json!({
                "temperature": request.temperature,
            })),
        };

        let wire = self.post_generate(&request.model, &body).await?;
        Ok(normalize_response(wire))
    }

    async fn synthesize(&self, text: &str, voice: &str) -> Result<Option<String>> {
        let body = WireRequest {
            system_instruction: None,
            contents: vec![WireContent {
                role: None,
                parts: vec![WirePart {
                    text: Some(text.to_string()),
                    ..Default::default()
                }],
            }],
            tools: Vec::new(),
            safety_settings: permissive_safety(),
            generation_config: Some(serde_json::json!({
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": voice }
                    }
                },
            })),
        };

        let wire = self
            .post_generate(TTS_MODEL, &body)
            .await
            .map_err(|e| ProboticsError::SynthesisError(e.to_string()))?;

        let audio = wire
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.inline_data)
            .map(|d| d.data);
        Ok(audio)
    }

    async fn render_image(&self, prompt: &str) -> Result<Option<GeneratedImage>> {
        let body = WireRequest {
            system_instruction: None,
            contents: vec![WireContent {
                role: None,
                parts: vec![WirePart {
                    text: Some(prompt.to_string()),
                    ..Default::default()
                }],
            }],
            tools: Vec::new(),
            safety_settings: permissive_safety(),
            generation_config: None,
        };

        let wire = self.post_generate(IMAGE_MODEL, &body).await?;

        let image = wire
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| {
                content
                    .parts
                    .into_iter()
                    .find_map(|p| p.inline_data)
                    .map(|d| GeneratedImage {
                        base64: d.data,
                        mime_type: if d.mime_type.is_empty() {
                            "image/png".to_string()
                        } else {
                            d.mime_type
                        },
                    })
            });
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(matches!(
            GeminiClient::new("   "),
            Err(ProboticsError::CredentialsError(_))
        ));
        assert!(GeminiClient::new("key-123").is_ok());
    }

    #[test]
    fn test_wire_request_shape() {
        let body = WireRequest {
            system_instruction: Some(WireContent {
                role: None,
                parts: vec![WirePart {
                    text: Some("persona".into()),
                    ..Default::default()
                }],
            }),
            contents: vec![WireContent {
                role: Some("user".into()),
                parts: vec![WirePart {
                    text: Some("hola".into()),
                    ..Default::default()
                }],
            }],
            tools: vec![serde_json::json!({"googleSearch": {}})],
            safety_settings: permissive_safety(),
            generation_config: Some(serde_json::json!({"temperature": 0.7})),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "persona");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["safetySettings"][0]["threshold"], "BLOCK_NONE");
        assert_eq!(json["safetySettings"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_normalize_response_extracts_calls_and_grounding() {
        let wire: WireResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Working on it. "},
                        {"functionCall": {"name": "generate_image", "args": {"prompt": "a fox"}}}
                    ]
                },
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"title": "Example", "uri": "https://example.com"}},
                        {"retrieved": {}}
                    ]
                }
            }]
        }))
        .unwrap();

        let response = normalize_response(wire);
        assert_eq!(response.text, "Working on it. ");
        assert_eq!(response.function_calls.len(), 1);
        assert_eq!(response.function_calls[0].name, "generate_image");
        assert_eq!(response.grounding.len(), 1);
        assert_eq!(response.grounding[0].uri, "https://example.com");
        assert_eq!(response.parts.len(), 2);
    }

    #[test]
    fn test_normalize_empty_response() {
        let response = normalize_response(WireResponse { candidates: vec![] });
        assert!(response.text.is_empty());
        assert!(!response.has_function_calls());
    }
}
