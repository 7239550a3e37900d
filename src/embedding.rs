//! Runtime-selected embedding provider.
//!
//! [`ConfiguredEmbedding`] is built once from an [`EmbeddingConfig`] by the
//! host process and then shared, typically behind an `Arc`, by every
//! evaluation.

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, EmbeddingConfig};
use crate::providers::TextProcessor;

#[cfg(feature = "provider-api")]
use crate::api_embedding::{ApiEmbedding, ApiEmbeddingError};
#[cfg(feature = "onnx")]
use crate::providers::onnx::{OnnxEncoderError, OnnxSentenceEncoder};

/// Error returned by [`ConfiguredEmbedding`].
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[cfg(feature = "provider-api")]
    #[error(transparent)]
    Api(#[from] ApiEmbeddingError),
    #[cfg(feature = "onnx")]
    #[error(transparent)]
    Onnx(#[from] OnnxEncoderError),
    /// No provider was configured.
    #[error("embedding provider is disabled")]
    Disabled,
}

/// One of the supported embedding providers.
#[derive(Debug)]
pub enum ConfiguredEmbedding {
    #[cfg(feature = "provider-api")]
    Api(ApiEmbedding),
    #[cfg(feature = "onnx")]
    Onnx(OnnxSentenceEncoder),
    Disabled,
}

impl ConfiguredEmbedding {
    /// Validate `config` and construct the provider it names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation fails, an API key variable is
    /// missing, or the provider cannot be initialised.
    ///
    /// # Examples
    ///
    /// ```
    /// use note_eval::{ConfiguredEmbedding, EmbeddingConfig, TextProcessor};
    ///
    /// let provider = ConfiguredEmbedding::from_config(EmbeddingConfig::Disabled).unwrap();
    /// assert!(provider.process("anything").is_err());
    /// ```
    pub fn from_config(config: EmbeddingConfig) -> Result<Self, ConfigError> {
        match config.validate()? {
            #[cfg(feature = "provider-api")]
            EmbeddingConfig::Api(api) => {
                let api_key = api
                    .api_key_env
                    .as_deref()
                    .map(|var| {
                        std::env::var(var).map_err(|_| ConfigError::MissingApiKey {
                            var: var.to_owned(),
                        })
                    })
                    .transpose()?;
                let timeout = std::time::Duration::from_secs(api.timeout_secs);
                info!(url = %api.url, timeout_secs = api.timeout_secs, "using HTTP embedding provider");
                Ok(Self::Api(ApiEmbedding::new(api.url, api_key, timeout)?))
            }
            #[cfg(feature = "onnx")]
            EmbeddingConfig::Onnx(onnx) => {
                info!(model = %onnx.model.path.display(), "loading ONNX sentence encoder");
                Ok(Self::Onnx(OnnxSentenceEncoder::new(onnx)?))
            }
            EmbeddingConfig::Disabled => {
                info!("semantic similarity disabled");
                Ok(Self::Disabled)
            }
        }
    }
}

impl TextProcessor for ConfiguredEmbedding {
    type Output = Box<[f32]>;
    type Error = EmbeddingError;

    fn process(&self, input: &str) -> Result<Self::Output, Self::Error> {
        match self {
            #[cfg(feature = "provider-api")]
            Self::Api(provider) => Ok(provider.process(input)?),
            #[cfg(feature = "onnx")]
            Self::Onnx(provider) => Ok(provider.process(input)?),
            Self::Disabled => Err(EmbeddingError::Disabled),
        }
    }
}
