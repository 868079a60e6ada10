//! Runtime settings for fermi.
//!
//! One secret (the API key, read from the environment at startup) plus
//! static generation parameters. Fixed once loaded, never mutated.

use serde::{Deserialize, Serialize};

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Model requested from the API.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Generation parameters sent with every request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on reply length, in tokens.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_output_tokens() -> u32 {
    500
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Startup configuration: the secret plus fixed parameters.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API credential. Required; its absence is fatal at startup.
    pub api_key: String,

    /// Model name, e.g. `gemini-1.5-flash`.
    pub model: String,

    /// Static generation parameters.
    pub generation: GenerationParams,
}

impl Settings {
    /// Build settings with the given key and the fixed defaults.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            generation: GenerationParams::default(),
        }
    }

    /// Read the secret from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::with_api_key(key)),
            _ => Err(ConfigError::MissingApiKey),
        }
    }
}

/// Errors that can occur when loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The required secret is absent or blank.
    #[error(
        "GEMINI_API_KEY is not set. Create an API key in Google AI Studio \
         and export GEMINI_API_KEY before launching."
    )]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_defaults() {
        let params = GenerationParams::default();
        assert!((params.temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(params.max_output_tokens, 500);
        assert_eq!(params.timeout_seconds, 60);
    }

    #[test]
    fn test_generation_params_fill_missing_fields() {
        let params: GenerationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.max_output_tokens, 500);

        let params: GenerationParams =
            serde_json::from_str(r#"{"temperature": 0.9}"#).unwrap();
        assert!((params.temperature - 0.9).abs() < f32::EPSILON);
        assert_eq!(params.timeout_seconds, 60);
    }

    #[test]
    fn test_settings_with_api_key() {
        let settings = Settings::with_api_key("test-key");
        assert_eq!(settings.api_key, "test-key");
        assert_eq!(settings.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_missing_key_message_names_the_variable() {
        let msg = ConfigError::MissingApiKey.to_string();
        assert!(msg.contains("GEMINI_API_KEY"));
    }
}
