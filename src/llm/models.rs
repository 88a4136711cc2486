//! Centralized model definitions
//!
//! Every model the service can talk to is listed here, so adding a model is a
//! one-entry change.

use super::registry::LlmConfig;
use super::{GroqService, LlmService};
use std::sync::Arc;

/// LLM provider enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Groq,
}

impl Provider {
    /// Get the display name for this provider
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Groq => "Groq",
        }
    }

    /// Get the environment variable name for this provider's API key
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_API_KEY",
        }
    }

    /// Build a service for `model` using the provider's credentials from `config`
    pub fn build(self, model: &ModelDef, config: &LlmConfig) -> Result<Arc<dyn LlmService>, String> {
        match self {
            Provider::Groq => {
                let api_key = config
                    .groq_api_key
                    .as_deref()
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| format!("{} requires {}", model.id, self.api_key_env_var()))?;
                let service = GroqService::new(
                    api_key.to_string(),
                    model.id,
                    config.base_url.as_deref(),
                    config.timeout,
                )
                .map_err(|e| e.message)?;
                Ok(Arc::new(service))
            }
        }
    }
}

/// Model definition with metadata
#[derive(Debug, Clone)]
pub struct ModelDef {
    /// Model ID as sent on the wire (e.g., "llama-3.1-8b-instant")
    pub id: &'static str,
    pub provider: Provider,
    /// Human-readable description
    pub description: &'static str,
    /// Context window size in tokens
    pub context_window: usize,
}

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Get all available model definitions
pub fn all_models() -> &'static [ModelDef] {
    &[
        ModelDef {
            id: "llama-3.1-8b-instant",
            provider: Provider::Groq,
            description: "Llama 3.1 8B Instant (fast, default)",
            context_window: 131_072,
        },
        ModelDef {
            id: "llama-3.3-70b-versatile",
            provider: Provider::Groq,
            description: "Llama 3.3 70B Versatile (more capable, slower)",
            context_window: 131_072,
        },
        ModelDef {
            id: "gemma2-9b-it",
            provider: Provider::Groq,
            description: "Gemma 2 9B Instruct",
            context_window: 8_192,
        },
    ]
}
