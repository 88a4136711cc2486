//! Decides the reply for a user turn

use super::config::GenerationConfig;
use super::overrides::DemoOverrideTable;
use super::transcript::{Role, TranscriptStore};
use crate::llm::{LlmErrorKind, LlmMessage, LlmRequest, MessageRole, ModelRegistry};
use serde::Serialize;
use std::sync::Arc;

/// Prefix of every user-visible failure diagnostic
pub const WARNING_MARKER: &str = "⚠️";

/// Outcome of asking for a reply. Failures are values, never errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Answered from the demo override table
    Canned(String),
    /// Answered by the model
    Generated(String),
    Failed { kind: LlmErrorKind, detail: String },
}

/// Where a reply came from, as reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Canned,
    Generated,
    Failed,
}

impl Resolution {
    /// Text to show the user, with failures rendered as `⚠️ Error: <detail>`
    pub fn render(&self) -> String {
        self.render_as("Error")
    }

    pub fn render_as(&self, label: &str) -> String {
        match self {
            Resolution::Canned(text) | Resolution::Generated(text) => text.clone(),
            Resolution::Failed { detail, .. } => format!("{WARNING_MARKER} {label}: {detail}"),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Resolution::Failed { .. })
    }

    pub fn source(&self) -> ReplySource {
        match self {
            Resolution::Canned(_) => ReplySource::Canned,
            Resolution::Generated(_) => ReplySource::Generated,
            Resolution::Failed { .. } => ReplySource::Failed,
        }
    }
}

/// Override table first, remote model second
pub struct ResponseResolver {
    overrides: Arc<DemoOverrideTable>,
    registry: Arc<ModelRegistry>,
}

impl ResponseResolver {
    pub fn new(overrides: Arc<DemoOverrideTable>, registry: Arc<ModelRegistry>) -> Self {
        Self {
            overrides,
            registry,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Reply to `input`.
    ///
    /// `history` is sent as context and is expected to end with `input` as the
    /// latest user turn; if it does not, `input` is added to the request.
    pub async fn resolve(
        &self,
        input: &str,
        config: &GenerationConfig,
        history: &TranscriptStore,
    ) -> Resolution {
        if let Some(canned) = self.overrides.lookup(input) {
            tracing::debug!("Answering from demo override table");
            return Resolution::Canned(canned.to_string());
        }

        let request = build_request(input, config, history);
        self.complete(config, &request).await
    }

    /// Send `request` to the model named by `config`
    pub(super) async fn complete(
        &self,
        config: &GenerationConfig,
        request: &LlmRequest,
    ) -> Resolution {
        let Some(service) = self.registry.get(&config.model) else {
            tracing::warn!(model = %config.model, "Model not available");
            return Resolution::Failed {
                kind: LlmErrorKind::InvalidRequest,
                detail: format!("unknown model: {}", config.model),
            };
        };

        match service.complete(request).await {
            Ok(response) if response.text.trim().is_empty() => Resolution::Failed {
                kind: LlmErrorKind::MalformedResponse,
                detail: "model returned an empty reply".to_string(),
            },
            Ok(response) => Resolution::Generated(response.text),
            Err(e) => {
                tracing::warn!(
                    model = %config.model,
                    kind = %e.kind,
                    error = %e.message,
                    "Completion failed"
                );
                Resolution::Failed {
                    kind: e.kind,
                    detail: e.message,
                }
            }
        }
    }
}

pub(super) fn generation_request(
    config: &GenerationConfig,
    messages: Vec<LlmMessage>,
) -> LlmRequest {
    LlmRequest {
        system: Some(config.system_prompt.clone()),
        messages,
        max_tokens: Some(config.max_tokens),
        temperature: Some(config.temperature),
    }
}

/// Failed exchanges are left out of the history: the diagnostic and the
/// question it answered never reach the model.
fn build_request(input: &str, config: &GenerationConfig, history: &TranscriptStore) -> LlmRequest {
    let mut messages: Vec<LlmMessage> = Vec::with_capacity(history.len() + 1);
    for turn in history.all() {
        if turn.is_diagnostic() {
            if messages.last().is_some_and(|m| m.role == MessageRole::User) {
                messages.pop();
            }
            continue;
        }
        messages.push(match turn.role() {
            Role::User => LlmMessage::user(turn.content()),
            Role::Assistant => LlmMessage::assistant(turn.content()),
        });
    }

    let ends_with_input = history
        .last()
        .is_some_and(|t| t.role() == Role::User && t.content() == input);
    if !ends_with_input {
        messages.push(LlmMessage::user(input));
    }

    generation_request(config, messages)
}
