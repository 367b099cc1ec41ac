//! Google Gemini provider implementation
//!
//! This module implements the LLMProvider trait for the Gemini
//! `generateContent` endpoint, including Google Search grounding and
//! schema-constrained JSON output.
//! See: https://ai.google.dev/api/generate-content

use crate::{
    CompletionRequest, CompletionResponse, GroundingSource, LLMError, LLMProvider, Message, Result,
    Role, StopReason, TokenUsage, dedup_sources,
};
use super::decode_body;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the Gemini provider
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: String,

    /// Base URL (default: "https://generativelanguage.googleapis.com/v1beta")
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider with custom configuration
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError(
                "Gemini API key is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new Gemini provider with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.config.api_base)
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    #[instrument(skip(self, request), fields(model = %request.model, web_search = request.web_search))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to Gemini API");

        let model = request.model.clone();
        let gemini_request = build_gemini_request(request);

        let response = self
            .client
            .post(self.endpoint(&model))
            .header("x-goog-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(&gemini_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await?;
            return Err(LLMError::from_status(status, error_text, &model));
        }

        let body = response.text().await?;
        let gemini_response: GeminiResponse = decode_body(&body)?;

        parse_gemini_response(gemini_response)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// ============================================================================
// Gemini-specific request types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GeminiTool {
    #[serde(rename = "googleSearch")]
    google_search: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

// ============================================================================
// Gemini-specific response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

// ============================================================================
// Conversion functions
// ============================================================================

fn text_content(role: Option<&str>, text: String) -> GeminiContent {
    GeminiContent {
        role: role.map(str::to_string),
        parts: vec![GeminiPart { text: Some(text) }],
    }
}

fn build_gemini_request(request: CompletionRequest) -> GeminiRequest {
    let contents = request
        .messages
        .into_iter()
        .map(|msg| {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "model",
            };
            text_content(Some(role), msg.content)
        })
        .collect();

    let tools = if request.web_search {
        vec![GeminiTool {
            google_search: json!({}),
        }]
    } else {
        Vec::new()
    };

    let (response_mime_type, response_schema) = match request.response_format {
        Some(format) => (
            Some("application/json".to_string()),
            Some(to_gemini_schema(&format.schema)),
        ),
        None => (None, None),
    };

    GeminiRequest {
        contents,
        system_instruction: request.system.map(|s| text_content(None, s)),
        tools,
        generation_config: GenerationConfig {
            max_output_tokens: request.max_tokens,
            temperature: request.temperature,
            response_mime_type,
            response_schema,
        },
    }
}

/// Convert a JSON Schema to Gemini's OpenAPI subset
///
/// Gemini spells types in upper case (`OBJECT`, `STRING`, ...). Only string
/// values of `type` keys change; a property that happens to be named `type`
/// holds an object and is walked like any other.
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let converted = match (key.as_str(), value) {
                        ("type", Value::String(t)) => Value::String(t.to_uppercase()),
                        _ => to_gemini_schema(value),
                    };
                    (key.clone(), converted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

fn parse_gemini_response(response: GeminiResponse) -> Result<CompletionResponse> {
    let usage = response
        .usage_metadata
        .map(|u| TokenUsage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        })
        .unwrap_or_default();

    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LLMError::ProviderError(format!("prompt blocked: {reason}")));
        }
        return Err(LLMError::UnexpectedResponse(
            "No candidates in response".to_string(),
        ));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let sources = candidate
        .grounding_metadata
        .map(|meta| {
            dedup_sources(
                meta.grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| chunk.web)
                    .map(|web| GroundingSource::from_parts(web.title, web.uri)),
            )
        })
        .unwrap_or_default();

    let stop_reason = map_finish_reason(candidate.finish_reason.as_deref());

    debug!(
        "Received response - stop_reason: {:?}, tokens: {}/{}, sources: {}",
        stop_reason,
        usage.input_tokens,
        usage.output_tokens,
        sources.len()
    );

    Ok(CompletionResponse {
        message: Message::assistant(text),
        stop_reason,
        usage,
        sources,
    })
}

/// Map Gemini finish reason to our format
fn map_finish_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("STOP") | None => StopReason::EndTurn,
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII") => {
            StopReason::ContentFilter
        }
        Some(other) => {
            debug!("Unknown finish reason: {}", other);
            StopReason::EndTurn
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResponseFormat;

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(
            provider.endpoint("gemini-3-pro-preview"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-pro-preview:generateContent"
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = GeminiProvider::new("  ");
        assert!(matches!(result, Err(LLMError::ConfigurationError(_))));
    }

    #[test]
    fn test_custom_config() {
        let config = GeminiConfig::new("k")
            .with_api_base("http://localhost:8080/v1beta/")
            .with_timeout(30);
        let provider = GeminiProvider::with_config(config).unwrap();
        assert_eq!(provider.config().timeout_secs, 30);
        assert_eq!(
            provider.endpoint("m"),
            "http://localhost:8080/v1beta/models/m:generateContent"
        );
    }

    #[test]
    fn test_request_serialization() {
        let request = CompletionRequest::builder("gemini-3-pro-preview")
            .system("Be precise")
            .add_message(Message::user("PETR4.SA"))
            .max_tokens(4096)
            .response_format(ResponseFormat::json_schema(
                "financial_record",
                json!({"type": "object", "properties": {"ticker": {"type": "string"}}}),
            ))
            .web_search(true)
            .build();

        let body = serde_json::to_value(build_gemini_request(request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "PETR4.SA");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be precise");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["tools"][0]["googleSearch"], json!({}));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 4096);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["properties"]["ticker"]["type"],
            "STRING"
        );
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_request_without_search_or_schema() {
        let request = CompletionRequest::builder("m")
            .add_message(Message::user("hi"))
            .build();
        let body = serde_json::to_value(build_gemini_request(request)).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("systemInstruction").is_none());
        assert!(body["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn test_schema_conversion_keeps_property_named_type() {
        let schema = json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "type": {"type": "string"},
                    "amount": {"type": "number"}
                },
                "required": ["type"]
            }
        });

        let converted = to_gemini_schema(&schema);
        assert_eq!(converted["type"], "ARRAY");
        assert_eq!(converted["items"]["type"], "OBJECT");
        assert_eq!(converted["items"]["properties"]["type"]["type"], "STRING");
        assert_eq!(converted["items"]["properties"]["amount"]["type"], "NUMBER");
        assert_eq!(converted["items"]["required"], json!(["type"]));
    }

    #[test]
    fn test_parse_grounded_response() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "{\"ticker\":"}, {"text": "\"VALE3.SA\"}"}]
                },
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://a.example/x", "title": "a.example"}},
                        {"retrievedContext": {"uri": "gs://bucket/doc"}},
                        {"web": {"uri": "https://a.example/x", "title": "dup"}},
                        {"web": {"uri": "https://b.example/y"}}
                    ]
                }
            }],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 80}
        });

        let response: GeminiResponse = serde_json::from_value(raw).unwrap();
        let parsed = parse_gemini_response(response).unwrap();

        assert_eq!(parsed.text(), r#"{"ticker":"VALE3.SA"}"#);
        assert_eq!(parsed.stop_reason, StopReason::EndTurn);
        assert_eq!(parsed.usage.total(), 200);
        assert_eq!(parsed.sources.len(), 2);
        assert_eq!(parsed.sources[0].title.as_deref(), Some("a.example"));
        assert_eq!(parsed.sources[1].uri.as_deref(), Some("https://b.example/y"));
    }

    #[test]
    fn test_parse_without_candidates() {
        let response: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        let err = parse_gemini_response(response).unwrap_err();
        assert!(err.is_malformed_response());
    }

    #[test]
    fn test_parse_blocked_prompt() {
        let response: GeminiResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        let err = parse_gemini_response(response).unwrap_err();
        assert!(matches!(err, LLMError::ProviderError(msg) if msg.contains("SAFETY")));
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(map_finish_reason(Some("STOP")), StopReason::EndTurn);
        assert_eq!(map_finish_reason(None), StopReason::EndTurn);
        assert_eq!(map_finish_reason(Some("MAX_TOKENS")), StopReason::MaxTokens);
        assert_eq!(map_finish_reason(Some("SAFETY")), StopReason::ContentFilter);
        assert_eq!(map_finish_reason(Some("OTHER")), StopReason::EndTurn);
    }
}
