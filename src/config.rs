//! Configuration loading and management for stacksniff.
//!
//! Settings come from an optional `stacksniff.toml`, with environment
//! variable overrides for the API key and model.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "stacksniff.toml";

/// User-Agent string identifying this tool
const USER_AGENT: &str = concat!("stacksniff/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model identifier (e.g., "llama-3.1-70b-versatile")
    pub model: String,
    /// OpenAI-compatible API root
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Client-side timeout for the completion request
    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.1-70b-versatile".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            temperature: 0.2,
            max_tokens: 1000,
            timeout_secs: 60,
        }
    }
}

/// Page fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// API keys configuration (normally loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub groq_key: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from `path`, or from the default locations.
    ///
    /// Missing default files are not an error; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => match Self::find_config_file() {
                Some(path) => Self::load_from(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific path, without env overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Override the API key and model from `GROQ_API_KEY` and `MODEL`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GROQ_API_KEY") {
            self.api.groq_key = Some(key);
        }
        if let Some(model) = lookup("MODEL").filter(|m| !m.trim().is_empty()) {
            self.agent.model = model;
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        let home_config = dirs::home_dir()?
            .join(".config")
            .join("stacksniff")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }

    /// The Groq API key, if set and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.api
            .groq_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}
