use serde::{Deserialize, Serialize};

use super::errors::OnnxEncoderError;

/// Reduction from per-token hidden states to one sentence vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pooling {
    /// Average of the hidden states whose attention mask is set.
    #[default]
    Mean,
    /// Hidden state of the first token.
    Cls,
}

impl Pooling {
    /// Pool a row-major `[tokens, hidden]` matrix.
    ///
    /// Returns an empty vector when `hidden` is zero or no token is attended.
    #[must_use]
    pub fn apply(self, states: &[f32], mask: &[u32], hidden: usize) -> Vec<f32> {
        if hidden == 0 {
            return Vec::new();
        }
        match self {
            Self::Cls => states.chunks_exact(hidden).next().map(<[f32]>::to_vec).unwrap_or_default(),
            Self::Mean => mean_pool(states, mask, hidden),
        }
    }
}

#[expect(clippy::float_arithmetic, reason = "averaging hidden states")]
#[expect(clippy::cast_precision_loss, reason = "token count fits in f32")]
fn mean_pool(states: &[f32], mask: &[u32], hidden: usize) -> Vec<f32> {
    let mut sum = vec![0.0_f32; hidden];
    let mut attended = 0_usize;
    for (row, _) in states
        .chunks_exact(hidden)
        .zip(mask)
        .filter(|(_, flag)| **flag != 0)
    {
        for (acc, value) in sum.iter_mut().zip(row) {
            *acc += value;
        }
        attended += 1;
    }
    if attended == 0 {
        return Vec::new();
    }
    let count = attended as f32;
    sum.iter_mut().for_each(|acc| *acc /= count);
    sum
}

/// Scale `vector` to unit Euclidean length.
///
/// # Errors
///
/// Returns `ZeroNorm` when the vector has no magnitude.
#[expect(clippy::float_arithmetic, reason = "vector normalisation")]
pub fn l2_normalise(mut vector: Vec<f32>) -> Result<Vec<f32>, OnnxEncoderError> {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if !norm.is_normal() {
        return Err(OnnxEncoderError::ZeroNorm);
    }
    vector.iter_mut().for_each(|v| *v /= norm);
    Ok(vector)
}
