//! Model registry for managing available LLM services

use super::models::DEFAULT_MODEL;
use super::{all_models, LlmService, LoggingService};
use crate::config::{env_var, parse_env, ConfigError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for LLM providers
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub groq_api_key: Option<String>,
    /// Override for the OpenAI-compatible base URL (e.g. a local proxy)
    pub base_url: Option<String>,
    /// Transport timeout applied by the HTTP client
    pub timeout: Duration,
    /// Default model ID
    pub default_model: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            default_model: None,
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let timeout = parse_env::<u64>("GROQ_TIMEOUT_SECS")?
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        Ok(Self {
            groq_api_key: env_var("GROQ_API_KEY"),
            base_url: env_var("GROQ_BASE_URL"),
            timeout,
            default_model: env_var("DEFAULT_MODEL"),
        })
    }
}

/// Registry of available LLM models
pub struct ModelRegistry {
    services: HashMap<String, Arc<dyn LlmService>>,
    default_model: String,
}

impl ModelRegistry {
    pub fn new(config: &LlmConfig) -> Self {
        let mut services: HashMap<String, Arc<dyn LlmService>> = HashMap::new();

        for model_def in all_models() {
            match model_def.provider.build(model_def, config) {
                Ok(service) => {
                    services.insert(
                        model_def.id.to_string(),
                        Arc::new(LoggingService::new(service)),
                    );
                }
                Err(reason) => {
                    tracing::debug!(model = model_def.id, %reason, "Model unavailable");
                }
            }
        }

        let default_model = Self::pick_default(config.default_model.as_deref(), &services);
        Self {
            services,
            default_model,
        }
    }

    /// Build a registry from already constructed services
    #[cfg(test)]
    pub fn from_services(
        default_model: impl Into<String>,
        services: impl IntoIterator<Item = Arc<dyn LlmService>>,
    ) -> Self {
        let services = services
            .into_iter()
            .map(|s| (s.model_id().to_string(), s))
            .collect();
        Self {
            services,
            default_model: default_model.into(),
        }
    }

    fn pick_default(
        requested: Option<&str>,
        services: &HashMap<String, Arc<dyn LlmService>>,
    ) -> String {
        if let Some(requested) = requested {
            if services.contains_key(requested) {
                return requested.to_string();
            }
            tracing::warn!(model = requested, "Requested default model is not available");
        }

        if services.contains_key(DEFAULT_MODEL) || services.is_empty() {
            return DEFAULT_MODEL.to_string();
        }

        let mut ids: Vec<_> = services.keys().collect();
        ids.sort();
        ids[0].clone()
    }

    /// Get a model by ID
    pub fn get(&self, model_id: &str) -> Option<Arc<dyn LlmService>> {
        self.services.get(model_id).cloned()
    }

    /// Get the default model ID
    pub fn default_model_id(&self) -> &str {
        &self.default_model
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.services.contains_key(model_id)
    }

    /// List all available model IDs
    pub fn available_models(&self) -> Vec<String> {
        let mut models: Vec<_> = self.services.keys().cloned().collect();
        models.sort();
        models
    }

    /// Get detailed information about available models
    pub fn available_model_info(&self) -> Vec<crate::api::ModelInfo> {
        all_models()
            .iter()
            .filter(|def| self.services.contains_key(def.id))
            .map(|def| crate::api::ModelInfo {
                id: def.id.to_string(),
                provider: def.provider.display_name().to_string(),
                description: def.description.to_string(),
                context_window: def.context_window,
            })
            .collect()
    }

    /// Check if any models are available
    pub fn has_models(&self) -> bool {
        !self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed_config() -> LlmConfig {
        LlmConfig {
            groq_api_key: Some("gsk_test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_api_key_no_models() {
        let registry = ModelRegistry::new(&LlmConfig::default());
        assert!(!registry.has_models());
        assert!(registry.available_models().is_empty());
    }

    #[test]
    fn test_api_key_enables_all_models() {
        let registry = ModelRegistry::new(&keyed_config());
        assert_eq!(registry.available_models().len(), all_models().len());
        assert!(registry.get("llama-3.1-8b-instant").is_some());
        assert!(registry.contains("llama-3.3-70b-versatile"));
    }

    #[test]
    fn test_default_model_selection() {
        let registry = ModelRegistry::new(&keyed_config());
        assert_eq!(registry.default_model_id(), DEFAULT_MODEL);
    }

    #[test]
    fn test_custom_default_model() {
        let config = LlmConfig {
            default_model: Some("llama-3.3-70b-versatile".to_string()),
            ..keyed_config()
        };
        let registry = ModelRegistry::new(&config);
        assert_eq!(registry.default_model_id(), "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_unknown_default_model_falls_back() {
        let config = LlmConfig {
            default_model: Some("no-such-model".to_string()),
            ..keyed_config()
        };
        let registry = ModelRegistry::new(&config);
        assert_eq!(registry.default_model_id(), DEFAULT_MODEL);
    }

    #[test]
    fn test_model_info_metadata() {
        let registry = ModelRegistry::new(&keyed_config());
        let infos = registry.available_model_info();
        assert_eq!(infos.len(), all_models().len());
        for info in &infos {
            assert_eq!(info.provider, "Groq");
            assert!(!info.description.is_empty());
            assert!(info.context_window > 0);
        }
    }
}
