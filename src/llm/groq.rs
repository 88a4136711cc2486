//! Groq provider implementation
//!
//! Groq serves the `OpenAI` chat-completions wire format, so this module
//! only translates between our request types and that format.

use super::types::{LlmMessage, LlmRequest, LlmResponse, MessageRole, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Chat-completions client bound to a single model
pub struct GroqService {
    client: Client,
    api_key: String,
    endpoint: String,
    model_id: String,
}

impl GroqService {
    pub fn new(
        api_key: String,
        model_id: &str,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let base = base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/');
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{base}/chat/completions"),
            model_id: model_id.to_string(),
        })
    }

    #[cfg(test)]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn translate_request(&self, request: &LlmRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(system) = request.system.as_deref().filter(|s| !s.is_empty()) {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: Some(system.to_string()),
            });
        }

        messages.extend(request.messages.iter().map(translate_message));

        ChatCompletionRequest {
            model: self.model_id.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        }
    }

    fn normalize_response(resp: ChatCompletionResponse) -> Result<LlmResponse, LlmError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::malformed("No choices in response"))?;

        let text = choice.message.content.unwrap_or_default();
        let usage = resp.usage.map_or_else(Usage::default, |u| Usage {
            input_tokens: u64::from(u.prompt_tokens),
            output_tokens: u64::from(u.completion_tokens),
        });

        Ok(LlmResponse { text, usage })
    }
}

fn translate_message(msg: &LlmMessage) -> WireMessage {
    let role = match msg.role {
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
    };
    WireMessage {
        role: role.to_string(),
        content: Some(msg.text.clone()),
    }
}

/// Map a non-success HTTP status and body onto an error classification
fn classify_error(status: StatusCode, body: &str) -> LlmError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map_or_else(|_| body.trim().to_string(), |resp| resp.error.message);

    match status.as_u16() {
        401 | 403 => LlmError::auth(format!("Authentication failed: {message}")),
        429 => LlmError::rate_limit(format!("Rate limit exceeded: {message}")),
        400 | 404 | 422 => LlmError::invalid_request(format!("Invalid request: {message}")),
        500..=599 => LlmError::server_error(format!("Server error: {message}")),
        _ => LlmError::unknown(format!("HTTP {status}: {message}")),
    }
}

#[async_trait]
impl LlmService for GroqService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let wire_request = self.translate_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::network(format!("Connection failed: {e}"))
                } else {
                    LlmError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::malformed(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Self::normalize_response(parsed)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// Chat-completions wire types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
#[allow(clippy::struct_field_names)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
