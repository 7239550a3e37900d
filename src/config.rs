//! Embedding provider configuration and its serialisation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "onnx")]
use crate::providers::onnx::{OnnxEncoderConfig, OnnxEncoderError};

/// Errors raised while validating or building a provider configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Endpoint URL was blank.
    #[error("embedding url cannot be empty")]
    EmptyUrl,
    /// Request timeout was zero.
    #[error("timeout_secs must be greater than 0")]
    ZeroTimeout,
    /// The named API key variable is unset or not valid unicode.
    #[error("environment variable {var} holding the API key is not set")]
    MissingApiKey { var: String },
    #[cfg(feature = "provider-api")]
    #[error(transparent)]
    Api(#[from] crate::api_embedding::ApiEmbeddingError),
    #[cfg(feature = "onnx")]
    #[error(transparent)]
    Onnx(#[from] OnnxEncoderError),
}

/// Which embedding provider to construct.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum EmbeddingConfig {
    /// HTTP endpoint returning embeddings as JSON.
    #[cfg(feature = "provider-api")]
    Api(ApiEmbeddingConfig),
    /// Local ONNX sentence encoder.
    #[cfg(feature = "onnx")]
    Onnx(OnnxEncoderConfig),
    /// No provider; semantic similarity scores `0.0`.
    #[default]
    Disabled,
}

/// Settings for the HTTP embedding provider.
#[cfg(feature = "provider-api")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiEmbeddingConfig {
    /// Endpoint receiving `{"input": text}` POST requests.
    pub url: String,
    /// Environment variable holding a bearer token, if the endpoint needs one.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Per-request timeout in seconds; must be greater than zero.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[cfg(feature = "provider-api")]
const fn default_timeout_secs() -> u64 {
    crate::api_embedding::DEFAULT_TIMEOUT.as_secs()
}

impl EmbeddingConfig {
    /// Ensure the configuration values are within acceptable bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if an API url is blank, the timeout is zero, or the
    /// ONNX parameters are invalid.
    #[must_use = "Validation should not be ignored"]
    pub fn validate(self) -> Result<Self, ConfigError> {
        match &self {
            #[cfg(feature = "provider-api")]
            Self::Api(api) => {
                if api.url.trim().is_empty() {
                    return Err(ConfigError::EmptyUrl);
                }
                if api.timeout_secs == 0 {
                    return Err(ConfigError::ZeroTimeout);
                }
            }
            #[cfg(feature = "onnx")]
            Self::Onnx(onnx) => onnx.validate()?,
            Self::Disabled => {}
        }
        Ok(self)
    }
}
