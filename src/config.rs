//! Startup configuration read from the environment

use crate::chat::ChatSettings;
use crate::llm::{LlmConfig, Provider};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;

/// Fatal configuration problems; the service refuses to start on any of these
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing {var}: export it before starting the server")]
    MissingApiKey { var: &'static str },
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Load `.env` from the working directory or its parents, for local
/// development. Variables already set in the process are kept.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load a specific env file with the same precedence as [`load_dotenv`]
pub fn load_dotenv_from(path: &Path) -> bool {
    dotenvy::from_path(path).is_ok()
}

/// Read a variable, treating empty values as unset
pub fn env_var(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse a variable; unset yields `None`, unparsable yields an error
pub fn parse_env<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    env_var(var)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { var, value })
        })
        .transpose()
}

/// Parse a boolean flag: `1/0`, `true/false`, `yes/no`, `on/off`
pub fn parse_flag(var: &'static str) -> Result<Option<bool>, ConfigError> {
    let Some(value) = env_var(var) else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidValue { var, value }),
    }
}

/// Everything the server needs at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub llm: LlmConfig,
    pub chat: ChatSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let llm = LlmConfig::from_env()?;
        if llm.groq_api_key.is_none() {
            return Err(ConfigError::MissingApiKey {
                var: Provider::Groq.api_key_env_var(),
            });
        }

        Ok(Self {
            port: parse_env("GROQWISE_PORT")?.unwrap_or(DEFAULT_PORT),
            llm,
            chat: ChatSettings::from_env()?,
        })
    }
}
