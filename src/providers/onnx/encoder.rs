use std::sync::Mutex;

use ort::{session::Session, value::TensorRef};
use tokenizers::{Tokenizer, TruncationDirection, TruncationParams, TruncationStrategy};

use super::{
    config::OnnxEncoderConfig,
    errors::OnnxEncoderError,
    pooling::{Pooling, l2_normalise},
};

#[derive(Debug)]
pub struct OnnxEncoder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    input_names: Vec<String>,
    output_name: String,
    pooling: Pooling,
    normalise: bool,
}

impl OnnxEncoder {
    /// Verifies the artefacts and opens an inference session.
    ///
    /// # Errors
    ///
    /// Returns configuration and runtime errors when artefacts cannot be
    /// verified, tokeniser setup fails, or the ONNX session cannot be created.
    pub fn new(config: OnnxEncoderConfig) -> Result<Self, OnnxEncoderError> {
        config.validate()?;
        config.model.verify()?;
        config.tokenizer.verify()?;

        let mut tokenizer = Tokenizer::from_file(&config.tokenizer.path).map_err(|source| {
            OnnxEncoderError::LoadTokenizer {
                path: config.tokenizer.path.clone(),
                source,
            }
        })?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_sequence_length,
                strategy: TruncationStrategy::LongestFirst,
                stride: 0,
                direction: TruncationDirection::Right,
            }))
            .map_err(OnnxEncoderError::ConfigureTruncation)?;
        tokenizer.with_padding(None);

        let session = Session::builder()
            .map_err(OnnxEncoderError::CreateSessionBuilder)?
            .commit_from_file(&config.model.path)
            .map_err(OnnxEncoderError::CreateSession)?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            input_names: config.input_names,
            output_name: config.output_name,
            pooling: config.pooling,
            normalise: config.normalise,
        })
    }

    /// Embeds one text as a pooled, optionally unit-length, vector.
    ///
    /// # Errors
    ///
    /// Returns encoding, inference, or shape errors when tokenisation fails,
    /// the runtime errors, or the output is not `[1, tokens, hidden]`.
    pub fn embed(&self, input: &str) -> Result<Vec<f32>, OnnxEncoderError> {
        if input.trim().is_empty() {
            return Err(OnnxEncoderError::Empty);
        }
        let encoding = self
            .tokenizer
            .encode(input, true)
            .map_err(OnnxEncoderError::Encode)?;

        let tokens = encoding.get_ids().len();
        let widen = |values: &[u32]| values.iter().map(|v| i64::from(*v)).collect::<Vec<_>>();
        let ids = widen(encoding.get_ids());
        let mask = widen(encoding.get_attention_mask());
        let type_ids = widen(encoding.get_type_ids());

        let ids_tensor = row_tensor(&ids)?;
        let mask_tensor = row_tensor(&mask)?;
        let type_tensor = row_tensor(&type_ids)?;

        let (ids_name, mask_name) = match (self.input_names.first(), self.input_names.get(1)) {
            (Some(first), Some(second)) => (first.as_str(), second.as_str()),
            _ => {
                return Err(OnnxEncoderError::InsufficientInputNames {
                    expected: 2,
                    actual: self.input_names.len(),
                });
            }
        };

        let mut session = self
            .session
            .lock()
            .map_err(|_| OnnxEncoderError::SessionPoisoned)?;
        let outputs = match self.input_names.get(2) {
            Some(type_name) => session.run(ort::inputs! {
                ids_name => ids_tensor,
                mask_name => mask_tensor,
                type_name.as_str() => type_tensor,
            }),
            None => session.run(ort::inputs! {
                ids_name => ids_tensor,
                mask_name => mask_tensor,
            }),
        }
        .map_err(OnnxEncoderError::Inference)?;

        let value = outputs
            .get(&self.output_name)
            .ok_or_else(|| OnnxEncoderError::OutputMissing {
                name: self.output_name.clone(),
            })?;
        let (shape, states) = value
            .try_extract_tensor::<f32>()
            .map_err(OnnxEncoderError::Inference)?;

        let dims: &[i64] = shape;
        let hidden = match dims {
            [1, t, h] if usize::try_from(*t).ok() == Some(tokens) => usize::try_from(*h).ok(),
            _ => None,
        }
        .filter(|h| *h > 0)
        .ok_or_else(|| OnnxEncoderError::UnexpectedShape {
            name: self.output_name.clone(),
            shape: dims.to_vec(),
            tokens,
        })?;

        let pooled = self
            .pooling
            .apply(states, encoding.get_attention_mask(), hidden);
        if self.normalise {
            l2_normalise(pooled)
        } else {
            Ok(pooled)
        }
    }
}

/// Wraps one encoded sequence as a `[1, tokens]` tensor view.
fn row_tensor(values: &[i64]) -> Result<TensorRef<'_, i64>, OnnxEncoderError> {
    TensorRef::from_array_view(([1_usize, values.len()], values))
        .map_err(OnnxEncoderError::EncodeTensor)
}
