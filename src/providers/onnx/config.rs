//! Configuration for the ONNX sentence encoder.

use serde::{Deserialize, Serialize};

use super::{artefact::OnnxArtefact, errors::OnnxEncoderError, pooling::Pooling};

/// Configuration for a local ONNX sentence encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OnnxEncoderConfig {
    /// Model artefact (ONNX graph) to load.
    pub model: OnnxArtefact,
    /// Tokeniser artefact consumed by `tokenizers`.
    pub tokenizer: OnnxArtefact,
    /// Graph input names: token ids, attention mask, and optionally token
    /// type ids, in that order.
    #[serde(default = "default_input_names")]
    pub input_names: Vec<String>,
    /// Graph output holding per-token hidden states `[1, tokens, hidden]`.
    #[serde(default = "default_output_name")]
    pub output_name: String,
    /// Inputs are truncated to this many tokens. Must be greater than zero.
    #[serde(default = "default_max_sequence_length")]
    pub max_sequence_length: usize,
    /// Reduction from token states to a sentence vector.
    #[serde(default)]
    pub pooling: Pooling,
    /// Scale pooled vectors to unit length.
    #[serde(default = "default_normalise")]
    pub normalise: bool,
}

fn default_input_names() -> Vec<String> {
    vec!["input_ids".into(), "attention_mask".into()]
}

fn default_output_name() -> String {
    "last_hidden_state".into()
}

const fn default_max_sequence_length() -> usize {
    256
}

const fn default_normalise() -> bool {
    true
}

impl OnnxEncoderConfig {
    /// Check the parameters that do not require touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error when fewer than two input names are given, the output
    /// name is empty, or `max_sequence_length` is zero.
    pub fn validate(&self) -> Result<(), OnnxEncoderError> {
        if self.max_sequence_length == 0 {
            return Err(OnnxEncoderError::ZeroSequenceLength);
        }
        if self.input_names.len() < 2 {
            return Err(OnnxEncoderError::InsufficientInputNames {
                expected: 2,
                actual: self.input_names.len(),
            });
        }
        if self.output_name.trim().is_empty() {
            return Err(OnnxEncoderError::MissingOutputName);
        }
        Ok(())
    }
}
