//! Local sentence-encoder embeddings backed by ONNX Runtime.
//!
//! Artefacts are verified against pinned SHA-256 digests before the session
//! is opened. Token states are mean-pooled over the attention mask and
//! scaled to unit length, matching the usual sentence-transformers export.
mod artefact;
mod config;
mod encoder;
mod errors;
mod pooling;

pub use artefact::{OnnxArtefact, sha256_hex};
pub use config::OnnxEncoderConfig;
pub use errors::OnnxEncoderError;
pub use pooling::Pooling;

use crate::providers::TextProcessor;
use encoder::OnnxEncoder;

/// Sentence embedding provider running a local ONNX model.
///
/// Construct it once and share it; the session is loaded eagerly and
/// inference calls are serialised internally.
#[derive(Debug)]
pub struct OnnxSentenceEncoder {
    inner: OnnxEncoder,
}

impl OnnxSentenceEncoder {
    /// Builds an encoder from disk artefacts.
    ///
    /// # Errors
    ///
    /// Returns [`OnnxEncoderError`] when validation, artefact verification,
    /// or ONNX initialisation fails.
    ///
    /// # Examples
    /// ```no_run
    /// use note_eval::providers::onnx::{OnnxArtefact, OnnxEncoderConfig, OnnxEncoderError, OnnxSentenceEncoder, Pooling};
    /// use note_eval::TextProcessor;
    ///
    /// # fn main() -> Result<(), OnnxEncoderError> {
    /// let config = OnnxEncoderConfig {
    ///     model: OnnxArtefact {
    ///         path: std::path::PathBuf::from("/models/all-MiniLM-L6-v2/model.onnx"),
    ///         sha256: "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef".into(),
    ///     },
    ///     tokenizer: OnnxArtefact {
    ///         path: std::path::PathBuf::from("/models/all-MiniLM-L6-v2/tokenizer.json"),
    ///         sha256: "fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210".into(),
    ///     },
    ///     input_names: vec!["input_ids".into(), "attention_mask".into(), "token_type_ids".into()],
    ///     output_name: "last_hidden_state".into(),
    ///     max_sequence_length: 256,
    ///     pooling: Pooling::Mean,
    ///     normalise: true,
    /// };
    /// let encoder = OnnxSentenceEncoder::new(config)?;
    /// let embedding = encoder.process("Subjective: patient reports mild headache.")?;
    /// # println!("{}", embedding.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: OnnxEncoderConfig) -> Result<Self, OnnxEncoderError> {
        OnnxEncoder::new(config).map(|inner| Self { inner })
    }
}

impl TextProcessor for OnnxSentenceEncoder {
    type Output = Box<[f32]>;
    type Error = OnnxEncoderError;

    fn process(&self, input: &str) -> Result<Self::Output, Self::Error> {
        self.inner.embed(input).map(Vec::into_boxed_slice)
    }
}
