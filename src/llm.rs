//! LLM provider abstraction
//!
//! Provides a common interface for the remote completion capability.

mod error;
mod groq;
mod models;
mod registry;
#[cfg(test)]
pub mod testing;
mod types;

pub use error::{LlmError, LlmErrorKind};
pub use groq::GroqService;
pub use models::{all_models, Provider, DEFAULT_MODEL};
pub use registry::{LlmConfig, ModelRegistry};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for LLM providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Make a completion request
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    messages = request.messages.len(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    total_tokens = response.usage.total(),
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = %e.kind,
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockLlmClient;
    use super::*;

    #[tokio::test]
    async fn test_logging_service_passes_through() {
        let mock = Arc::new(MockLlmClient::new("mock-model"));
        mock.queue_response(LlmResponse::text("hi"));
        mock.queue_error(LlmError::auth("bad key"));

        let logged = LoggingService::new(mock.clone());
        assert_eq!(logged.model_id(), "mock-model");

        let ok = logged.complete(&LlmRequest::prompt("a")).await.unwrap();
        assert_eq!(ok.text, "hi");

        let err = logged.complete(&LlmRequest::prompt("b")).await.unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Auth);
        assert_eq!(mock.calls(), 2);
    }
}
