//! HTTP embedding provider.
//!
//! Posts `{"input": text}` to an endpoint and accepts either a bare
//! `{"embedding": [...]}` body or an OpenAI-style
//! `{"data": [{"embedding": [...]}]}` body. An optional API key is sent as a
//! bearer token. Every request carries a timeout so a stalled endpoint fails
//! instead of blocking the evaluation.
//!
//! # Examples
//!
//! ```no_run
//! use note_eval::{ApiEmbedding, TextProcessor};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = ApiEmbedding::new("http://localhost:8080/embed", None, Duration::from_secs(10))?;
//! let embedding = provider.process("Assessment: tension headache")?;
//! assert!(!embedding.is_empty());
//! # Ok(())
//! # }
//! ```

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::providers::TextProcessor;

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error returned by [`ApiEmbedding`].
#[derive(Debug, Error)]
pub enum ApiEmbeddingError {
    /// Input or embedding was empty.
    #[error("empty input or embedding")]
    Empty,
    /// Client construction, transport, timeout, or HTTP status failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not contain a valid embedding.
    #[error("invalid response")]
    InvalidResponse,
}

impl PartialEq for ApiEmbeddingError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Empty, Self::Empty)
                | (Self::InvalidResponse, Self::InvalidResponse)
                | (Self::Request(_), Self::Request(_))
        )
    }
}

impl Eq for ApiEmbeddingError {}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ApiResponse {
    Bare(EmbeddingItem),
    Listed { data: Vec<EmbeddingItem> },
}

impl ApiResponse {
    fn into_embedding(self) -> Option<Vec<f32>> {
        match self {
            Self::Bare(item) => Some(item.embedding),
            Self::Listed { data } => data.into_iter().next().map(|item| item.embedding),
        }
    }
}

/// Embedding provider backed by an HTTP API.
#[derive(Debug, Clone)]
pub struct ApiEmbedding {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl ApiEmbedding {
    /// Create a provider for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiEmbeddingError::Request`] if the HTTP client cannot be
    /// constructed.
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiEmbeddingError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            api_key,
        })
    }

    /// Endpoint this provider posts to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TextProcessor for ApiEmbedding {
    type Output = Box<[f32]>;
    type Error = ApiEmbeddingError;

    fn process(&self, input: &str) -> Result<Self::Output, Self::Error> {
        if input.trim().is_empty() {
            return Err(ApiEmbeddingError::Empty);
        }
        let mut req = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "input": input }));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send()?.error_for_status()?;
        let embedding = resp
            .json::<ApiResponse>()
            .map_err(|_| ApiEmbeddingError::InvalidResponse)?
            .into_embedding()
            .ok_or(ApiEmbeddingError::InvalidResponse)?;

        if embedding.is_empty() {
            return Err(ApiEmbeddingError::Empty);
        }
        if !embedding.iter().all(|v| v.is_finite()) {
            return Err(ApiEmbeddingError::InvalidResponse);
        }
        Ok(embedding.into_boxed_slice())
    }
}
