use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the ONNX sentence encoder.
#[derive(Debug, Error)]
pub enum OnnxEncoderError {
    #[error("failed to read artefact at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artefact at {path} expected SHA-256 {expected} but found {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
    #[error("failed to load tokenizer from {path}: {source}")]
    LoadTokenizer {
        path: PathBuf,
        #[source]
        source: tokenizers::Error,
    },
    #[error("failed to configure tokenizer truncation: {0}")]
    ConfigureTruncation(#[source] tokenizers::Error),
    #[error("failed to construct ONNX session builder: {0}")]
    CreateSessionBuilder(#[source] ort::Error),
    #[error("failed to create ONNX session: {0}")]
    CreateSession(#[source] ort::Error),
    #[error("encoder requires at least {expected} input names but found {actual}")]
    InsufficientInputNames { expected: usize, actual: usize },
    #[error("encoder requires an output name")]
    MissingOutputName,
    #[error("encoder requires max_sequence_length > 0")]
    ZeroSequenceLength,
    #[error("input cannot be empty")]
    Empty,
    #[error("failed to encode text: {0}")]
    Encode(#[source] tokenizers::Error),
    #[error("failed to convert encoded text into tensor: {0}")]
    EncodeTensor(#[source] ort::Error),
    #[error("session mutex was poisoned by a previous panic")]
    SessionPoisoned,
    #[error("failed to run inference: {0}")]
    Inference(#[source] ort::Error),
    #[error("ONNX output \"{name}\" missing from session results")]
    OutputMissing { name: String },
    #[error("ONNX output \"{name}\" has shape {shape:?} but expected [1, {tokens}, hidden]")]
    UnexpectedShape {
        name: String,
        shape: Vec<i64>,
        tokens: usize,
    },
    #[error("pooled embedding has zero norm")]
    ZeroNorm,
}
