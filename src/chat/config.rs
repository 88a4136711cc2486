//! Generation parameters and their per-session holder

use super::ChatError;
use crate::config::{parse_env, parse_flag, ConfigError};
use crate::llm::DEFAULT_MODEL;
use serde::Serialize;

/// A named system prompt
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub prompt: &'static str,
}

pub const PROMPT_TEMPLATES: &[PromptTemplate] = &[
    PromptTemplate {
        name: "Teaching Assistant",
        prompt: "You are a helpful concise teaching assistant. Use short, clear explanations suitable for demo.",
    },
    PromptTemplate {
        name: "Friendly Chat",
        prompt: "You are a friendly and concise assistant. Keep responses short and demo-ready.",
    },
    PromptTemplate {
        name: "Technical Support",
        prompt: "You are a technical support assistant. Provide step-by-step guidance concisely.",
    },
];

impl PromptTemplate {
    pub fn find(name: &str) -> Option<&'static PromptTemplate> {
        PROMPT_TEMPLATES.iter().find(|t| t.name == name)
    }

    pub fn default_template() -> &'static PromptTemplate {
        &PROMPT_TEMPLATES[0]
    }
}

const DEFAULT_TEMPERATURE: f32 = 0.6;
const DEFAULT_MAX_TOKENS: u32 = 80;
const DEFAULT_TRANSCRIPT_BOUND: usize = 20;
const MIN_TRANSCRIPT_BOUND: usize = 2;

/// Inclusive range the `max_tokens` control may take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenBounds {
    pub min: u32,
    pub max: u32,
}

impl TokenBounds {
    /// Hard limits any configured range must sit within
    pub const FLOOR: u32 = 50;
    pub const CEILING: u32 = 300;

    /// Range from `FLOOR` up to `ceiling`, with `ceiling` clamped into the hard limits
    pub fn up_to(ceiling: u32) -> Self {
        Self {
            min: Self::FLOOR,
            max: ceiling.clamp(Self::FLOOR, Self::CEILING),
        }
    }

    pub fn clamp(self, value: i64) -> u32 {
        let clamped = value.clamp(i64::from(self.min), i64::from(self.max));
        u32::try_from(clamped).unwrap_or(self.max)
    }
}

impl Default for TokenBounds {
    fn default() -> Self {
        Self::up_to(120)
    }
}

/// Parameters of one completion request. Replaced wholesale on every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: PromptTemplate::default_template().prompt.to_string(),
        }
    }
}

/// A single change to a [`GenerationConfig`]
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigUpdate {
    Temperature(f32),
    MaxTokens(i64),
    SystemPrompt(String),
    /// Replace the system prompt with a named template
    Template(String),
    Model(String),
}

impl ConfigUpdate {
    /// Build an update from a field name and a JSON value
    pub fn parse(field: &str, value: &serde_json::Value) -> Result<Self, ChatError> {
        match field {
            "temperature" => {
                let v = value
                    .as_f64()
                    .ok_or_else(|| ChatError::invalid("temperature", "expected a number"))?;
                #[allow(clippy::cast_possible_truncation)]
                let temperature = v as f32;
                Ok(Self::Temperature(temperature))
            }
            "max_tokens" => {
                let v = value
                    .as_i64()
                    .ok_or_else(|| ChatError::invalid("max_tokens", "expected an integer"))?;
                Ok(Self::MaxTokens(v))
            }
            "system_prompt" => Ok(Self::SystemPrompt(expect_str("system_prompt", value)?)),
            "template" => Ok(Self::Template(expect_str("template", value)?)),
            "model" => Ok(Self::Model(expect_str("model", value)?)),
            other => Err(ChatError::UnknownField(other.to_string())),
        }
    }
}

fn expect_str(field: &'static str, value: &serde_json::Value) -> Result<String, ChatError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ChatError::invalid(field, "expected a string"))
}

/// Holder of a session's current generation parameters
#[derive(Debug, Clone)]
pub struct SessionConfig {
    current: GenerationConfig,
    bounds: TokenBounds,
}

impl SessionConfig {
    pub fn new(initial: GenerationConfig, bounds: TokenBounds) -> Self {
        let max_tokens = bounds.clamp(i64::from(initial.max_tokens));
        Self {
            current: GenerationConfig {
                max_tokens,
                temperature: initial.temperature.clamp(0.0, 1.0),
                ..initial
            },
            bounds,
        }
    }

    pub fn current(&self) -> &GenerationConfig {
        &self.current
    }

    pub fn bounds(&self) -> TokenBounds {
        self.bounds
    }

    /// Apply one change, clamping numeric values into range.
    ///
    /// The new config only affects requests made after this returns.
    pub fn update(&mut self, update: ConfigUpdate) -> Result<&GenerationConfig, ChatError> {
        let mut next = self.current.clone();
        match update {
            ConfigUpdate::Temperature(t) => {
                if !t.is_finite() {
                    return Err(ChatError::invalid("temperature", "must be a finite number"));
                }
                next.temperature = t.clamp(0.0, 1.0);
            }
            ConfigUpdate::MaxTokens(n) => next.max_tokens = self.bounds.clamp(n),
            ConfigUpdate::SystemPrompt(prompt) => next.system_prompt = prompt,
            ConfigUpdate::Template(name) => {
                let template =
                    PromptTemplate::find(&name).ok_or(ChatError::UnknownTemplate(name))?;
                next.system_prompt = template.prompt.to_string();
            }
            ConfigUpdate::Model(model) => {
                if model.trim().is_empty() {
                    return Err(ChatError::invalid("model", "must not be empty"));
                }
                next.model = model;
            }
        }
        self.current = next;
        Ok(&self.current)
    }
}

/// Service-wide chat behavior, fixed at startup
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Most recent turns kept per transcript; `None` keeps everything
    pub transcript_bound: Option<usize>,
    /// Shorten generated and canned replies to two sentences
    pub trim_replies: bool,
    pub token_bounds: TokenBounds,
    /// Config every new session starts from
    pub defaults: GenerationConfig,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            transcript_bound: Some(DEFAULT_TRANSCRIPT_BOUND),
            trim_replies: true,
            token_bounds: TokenBounds::default(),
            defaults: GenerationConfig::default(),
        }
    }
}

impl ChatSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        if let Some(bound) = parse_env::<usize>("GROQWISE_TRANSCRIPT_BOUND")? {
            settings.transcript_bound = Self::transcript_bound_from(bound)?;
        }
        if let Some(trim) = parse_flag("GROQWISE_TRIM_REPLIES")? {
            settings.trim_replies = trim;
        }
        if let Some(ceiling) = parse_env::<u32>("GROQWISE_MAX_TOKENS_CEILING")? {
            settings.token_bounds = TokenBounds::up_to(ceiling);
        }

        Ok(settings)
    }

    /// `0` means unbounded. A bound of 1 cannot hold a question with its
    /// reply, so every exchange would be evicted.
    pub fn transcript_bound_from(bound: usize) -> Result<Option<usize>, ConfigError> {
        match bound {
            0 => Ok(None),
            n if n < MIN_TRANSCRIPT_BOUND => Err(ConfigError::InvalidValue {
                var: "GROQWISE_TRANSCRIPT_BOUND",
                value: n.to_string(),
            }),
            n => Ok(Some(n)),
        }
    }

    /// Use `model` for sessions created from now on
    #[must_use]
    pub fn with_default_model(mut self, model: &str) -> Self {
        self.defaults.model = model.to_string();
        self
    }

    pub fn new_session_config(&self) -> SessionConfig {
        SessionConfig::new(self.defaults.clone(), self.token_bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> SessionConfig {
        ChatSettings::default().new_session_config()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < f32::EPSILON
    }

    #[test]
    fn test_defaults() {
        let cfg = config();
        let current = cfg.current();
        assert_eq!(current.model, "llama-3.1-8b-instant");
        assert!(approx(current.temperature, 0.6));
        assert_eq!(current.max_tokens, 80);
        assert!(current.system_prompt.starts_with("You are a helpful concise teaching assistant"));
        assert_eq!(cfg.bounds(), TokenBounds { min: 50, max: 120 });
    }

    #[test]
    fn test_temperature_clamped_high() {
        let mut cfg = config();
        cfg.update(ConfigUpdate::Temperature(5.0)).unwrap();
        assert!(approx(cfg.current().temperature, 1.0));
    }

    #[test]
    fn test_temperature_clamped_low() {
        let mut cfg = config();
        cfg.update(ConfigUpdate::Temperature(-1.0)).unwrap();
        assert!(approx(cfg.current().temperature, 0.0));
    }

    #[test]
    fn test_temperature_nan_rejected() {
        let mut cfg = config();
        let err = cfg.update(ConfigUpdate::Temperature(f32::NAN)).unwrap_err();
        assert!(matches!(err, ChatError::InvalidValue { field: "temperature", .. }));
        assert!(approx(cfg.current().temperature, 0.6));
    }

    #[test]
    fn test_max_tokens_clamped_to_bounds() {
        let mut cfg = config();
        cfg.update(ConfigUpdate::MaxTokens(5000)).unwrap();
        assert_eq!(cfg.current().max_tokens, 120);
        cfg.update(ConfigUpdate::MaxTokens(10)).unwrap();
        assert_eq!(cfg.current().max_tokens, 50);
        cfg.update(ConfigUpdate::MaxTokens(-3)).unwrap();
        assert_eq!(cfg.current().max_tokens, 50);
        cfg.update(ConfigUpdate::MaxTokens(99)).unwrap();
        assert_eq!(cfg.current().max_tokens, 99);
    }

    #[test]
    fn test_wider_bounds() {
        let mut cfg = SessionConfig::new(GenerationConfig::default(), TokenBounds::up_to(300));
        cfg.update(ConfigUpdate::MaxTokens(250)).unwrap();
        assert_eq!(cfg.current().max_tokens, 250);
        cfg.update(ConfigUpdate::MaxTokens(301)).unwrap();
        assert_eq!(cfg.current().max_tokens, 300);
    }

    #[test]
    fn test_transcript_bound_values() {
        assert_eq!(ChatSettings::transcript_bound_from(0).unwrap(), None);
        assert_eq!(ChatSettings::transcript_bound_from(2).unwrap(), Some(2));
        assert_eq!(ChatSettings::transcript_bound_from(20).unwrap(), Some(20));
        assert!(matches!(
            ChatSettings::transcript_bound_from(1),
            Err(ConfigError::InvalidValue {
                var: "GROQWISE_TRANSCRIPT_BOUND",
                ..
            })
        ));
    }

    #[test]
    fn test_bounds_ceiling_clamped() {
        assert_eq!(TokenBounds::up_to(1000).max, 300);
        assert_eq!(TokenBounds::up_to(10).max, 50);
    }

    #[test]
    fn test_template_replaces_system_prompt() {
        let mut cfg = config();
        cfg.update(ConfigUpdate::Template("Technical Support".to_string()))
            .unwrap();
        assert_eq!(
            cfg.current().system_prompt,
            "You are a technical support assistant. Provide step-by-step guidance concisely."
        );
    }

    #[test]
    fn test_unknown_template_leaves_config_untouched() {
        let mut cfg = config();
        let before = cfg.current().clone();
        let err = cfg
            .update(ConfigUpdate::Template("Pirate".to_string()))
            .unwrap_err();
        assert!(matches!(err, ChatError::UnknownTemplate(_)));
        assert_eq!(cfg.current(), &before);
    }

    #[test]
    fn test_update_replaces_value_not_history() {
        let mut cfg = config();
        let before = cfg.current().clone();
        cfg.update(ConfigUpdate::SystemPrompt("Be terse.".to_string()))
            .unwrap();
        assert_eq!(cfg.current().system_prompt, "Be terse.");
        assert_eq!(before.system_prompt, PromptTemplate::default_template().prompt);
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut cfg = config();
        assert!(cfg.update(ConfigUpdate::Model("  ".to_string())).is_err());
        cfg.update(ConfigUpdate::Model("gemma2-9b-it".to_string()))
            .unwrap();
        assert_eq!(cfg.current().model, "gemma2-9b-it");
    }

    #[test]
    fn test_parse_fields() {
        assert_eq!(
            ConfigUpdate::parse("max_tokens", &json!(100)).unwrap(),
            ConfigUpdate::MaxTokens(100)
        );
        assert_eq!(
            ConfigUpdate::parse("template", &json!("Friendly Chat")).unwrap(),
            ConfigUpdate::Template("Friendly Chat".to_string())
        );
        assert!(matches!(
            ConfigUpdate::parse("temperature", &json!(0.25)).unwrap(),
            ConfigUpdate::Temperature(t) if approx(t, 0.25)
        ));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            ConfigUpdate::parse("top_p", &json!(0.9)),
            Err(ChatError::UnknownField(_))
        ));
        assert!(matches!(
            ConfigUpdate::parse("temperature", &json!("hot")),
            Err(ChatError::InvalidValue { .. })
        ));
        assert!(matches!(
            ConfigUpdate::parse("max_tokens", &json!(80.5)),
            Err(ChatError::InvalidValue { .. })
        ));
        assert!(matches!(
            ConfigUpdate::parse("system_prompt", &json!(1)),
            Err(ChatError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_initial_config_is_clamped() {
        let initial = GenerationConfig {
            max_tokens: 999,
            temperature: 3.0,
            ..GenerationConfig::default()
        };
        let cfg = SessionConfig::new(initial, TokenBounds::default());
        assert_eq!(cfg.current().max_tokens, 120);
        assert!(approx(cfg.current().temperature, 1.0));
    }

    #[test]
    fn test_with_default_model() {
        let settings = ChatSettings::default().with_default_model("llama-3.3-70b-versatile");
        assert_eq!(
            settings.new_session_config().current().model,
            "llama-3.3-70b-versatile"
        );
    }

    #[test]
    fn test_template_lookup() {
        assert_eq!(PROMPT_TEMPLATES.len(), 3);
        assert!(PromptTemplate::find("Friendly Chat").is_some());
        assert!(PromptTemplate::find("friendly chat").is_none());
    }
}
