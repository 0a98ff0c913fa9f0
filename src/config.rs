//! Transcription provider configuration.
//!
//! The client is never built implicitly. Callers construct a
//! [`TranscriptionConfig`] (usually via [`TranscriptionConfig::from_env`]) and
//! hand it to [`crate::transcribe::TranscriptionClient::new`], which rejects
//! invalid settings up front.

use figment::{providers::Env, Figment};
use serde::Deserialize;

use crate::error::ConfigurationError;

/// Prefix shared by the provider's environment variables.
pub const ENV_PREFIX: &str = "GEMINI_";

/// Environment variable holding the provider API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Environment variable overriding the model name.
pub const MODEL_VAR: &str = "GEMINI_MODEL";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Clone, Deserialize)]
pub struct TranscriptionConfig {
    /// Missing in the environment deserializes as empty and fails `validate`.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl TranscriptionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// `GEMINI_API_KEY` and `GEMINI_MODEL`, mapped to `api_key` and `model`.
    pub fn env_provider() -> Env {
        Env::prefixed(ENV_PREFIX).only(&["api_key", "model"])
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_figment(Figment::new().merge(Self::env_provider()))
    }

    /// Extract and validate settings from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigurationError> {
        let mut config = figment.extract::<Self>().map_err(Box::new)?;
        if config.model.trim().is_empty() {
            config.model = default_model();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigurationError::MissingApiKey { var: API_KEY_VAR });
        }
        if self.model.trim().is_empty() {
            return Err(ConfigurationError::EmptyModel);
        }
        Ok(())
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for TranscriptionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptionConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}
