//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, the completion
//! provider and its credentials, and the extractor settings.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use taskwright_extractor::ExtractorConfig;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Extractor section is invalid
    #[error(transparent)]
    Extractor(#[from] taskwright_extractor::ConfigError),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which completion backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI-compatible chat completions
    OpenAi,
    /// Local Ollama instance
    Ollama,
    /// Fixed reply, for local development
    Mock,
}

/// Completion provider settings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend
    pub provider: ProviderKind,

    /// Model name
    pub model: String,

    /// Base URL; provider default when absent
    pub endpoint: Option<String>,

    /// API key; `OPENAI_API_KEY` is read at startup when absent
    pub api_key: Option<String>,

    /// Sampling temperature
    pub temperature: f32,

    /// HTTP timeout for one completion (seconds)
    pub timeout_secs: u64,

    /// Reply returned by the mock provider
    pub mock_response: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            model: "gpt-3.5-turbo".to_string(),
            endpoint: None,
            api_key: None,
            temperature: 0.7,
            timeout_secs: 60,
            mock_response: String::new(),
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LlmConfig {
    /// The API key, falling back to `fallback` (typically the environment)
    pub fn api_key_or(&self, fallback: Option<String>) -> Result<String, ConfigError> {
        self.api_key
            .clone()
            .or(fallback)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField("llm.api_key".to_string()))
    }
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 5000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Completion provider
    #[serde(default)]
    pub llm: LlmConfig,

    /// Extraction pipeline
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

/// Default port: 5000
fn default_bind_port() -> u16 {
    5000
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;

        if config.llm.model.trim().is_empty() {
            return Err(ConfigError::MissingField("llm.model".to_string()));
        }
        if config.llm.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }
        config.extractor.validate()?;

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            llm: LlmConfig {
                provider: ProviderKind::Mock,
                model: "mock".to_string(),
                ..Default::default()
            },
            extractor: ExtractorConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 5000);
        assert_eq!(config.llm.provider, ProviderKind::Mock);
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000

            [llm]
            provider = "ollama"
            model = "llama3"
            endpoint = "http://localhost:11434"

            [extractor]
            utc_offset_minutes = 120

            [extractor.prompt]
            categories = ["Work", "Home"]
            optional_fields = ["Classification"]
        "#;

        let config = ServerConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.llm.provider, ProviderKind::Ollama);
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.endpoint.as_deref(), Some("http://localhost:11434"));
        assert_eq!(config.extractor.utc_offset_minutes, 120);
        assert_eq!(config.extractor.prompt.categories, vec!["Work", "Home"]);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config.bind_port, 5000);
        assert_eq!(config.llm.provider, ProviderKind::OpenAi);
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.temperature, 0.7);
    }

    #[test]
    fn test_invalid_extractor_section() {
        let result = ServerConfig::from_toml("[extractor]\ncompletion_timeout_secs = 0\n");
        assert!(matches!(result, Err(ConfigError::Extractor(_))));
    }

    #[test]
    fn test_zero_llm_timeout_rejected() {
        let result = ServerConfig::from_toml("[llm]\ntimeout_secs = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_api_key_fallback() {
        let mut llm = LlmConfig::default();
        assert!(llm.api_key_or(None).is_err());
        assert_eq!(llm.api_key_or(Some("sk-env".to_string())).unwrap(), "sk-env");

        llm.api_key = Some("sk-file".to_string());
        assert_eq!(llm.api_key_or(Some("sk-env".to_string())).unwrap(), "sk-file");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let llm = LlmConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", llm);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
