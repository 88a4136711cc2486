//! API request and response types

use crate::chat::{
    GenerationConfig, PromptTemplate, SessionPhase, SessionSummary, TokenBounds, Turn,
    TurnOutcome,
};
use crate::llm::LlmErrorKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Reply to a chat message
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub outcome: TurnOutcome,
    /// Turns held after this exchange
    pub turns: usize,
}

/// Request to change one generation parameter
#[derive(Debug, Deserialize)]
pub struct ConfigUpdateRequest {
    pub field: String,
    pub value: serde_json::Value,
}

/// Current generation parameters of a session
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub session_id: Uuid,
    pub config: GenerationConfig,
    pub max_tokens_bounds: TokenBounds,
}

/// Full view of a session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub phase: SessionPhase,
    pub config: GenerationConfig,
    pub max_tokens_bounds: TokenBounds,
    pub transcript_bound: Option<usize>,
    pub turns: Vec<Turn>,
}

/// Response with a list of sessions
#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
}

/// Query for transcript export
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// Summary of a session's transcript
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<LlmErrorKind>,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Model information with metadata
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub provider: String,
    pub description: String,
    pub context_window: usize,
}

/// Response for model list
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    pub default: String,
}

/// Response for prompt template list
#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: &'static [PromptTemplate],
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
