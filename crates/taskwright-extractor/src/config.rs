//! Configuration for the extraction pipeline

use crate::prompt::PromptSpec;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Largest accepted UTC offset magnitude, in minutes (exclusive)
const MAX_OFFSET_MINUTES: u32 = 24 * 60;

/// Extractor configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize config TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the extraction pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Offset from UTC, in minutes, all completion dates are localized to
    pub utc_offset_minutes: i32,

    /// Upper bound on a single completion call (seconds)
    pub completion_timeout_secs: u64,

    /// Prompt content
    pub prompt: PromptSpec,
}

impl ExtractorConfig {
    /// Get the completion timeout as a Duration
    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }

    /// The fixed offset the date resolver localizes into
    pub fn timezone(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "utc_offset_minutes {} out of range",
                    self.utc_offset_minutes
                ))
            })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.utc_offset_minutes.unsigned_abs() >= MAX_OFFSET_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_minutes must be within ±{}",
                MAX_OFFSET_MINUTES - 1
            )));
        }
        if self.completion_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "completion_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.prompt.categories.is_empty() {
            return Err(ConfigError::Invalid(
                "prompt.categories must not be empty".to_string(),
            ));
        }
        if self.prompt.categories.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "prompt.categories must not contain blank entries".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for ExtractorConfig {
    /// UTC, 60 s completion timeout, default categories
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            completion_timeout_secs: 60,
            prompt: PromptSpec::default(),
        }
    }
}
