//! Embedding-based semantic similarity.
//!
//! Both texts are embedded by the injected provider and compared with cosine
//! similarity. Provider and vector failures are logged and scored as `0.0`,
//! so a missing or broken encoder never fails an evaluation.

use thiserror::Error;
use tracing::warn;

use crate::providers::TextProcessor;

/// Errors raised while comparing two embeddings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimilarityError {
    /// One of the vectors has no components.
    #[error("embedding is empty")]
    Empty,
    /// The vectors have different lengths.
    #[error("embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
    /// One of the vectors has zero or non-finite magnitude.
    #[error("embedding has zero or non-finite norm")]
    ZeroNorm,
}

/// Cosine similarity `a·b / (‖a‖·‖b‖)`, accumulated in `f64`.
///
/// # Errors
///
/// Returns [`SimilarityError`] when either vector is empty, the lengths
/// differ, or either norm is zero or non-finite.
///
/// # Examples
///
/// ```
/// use note_eval::semantic::cosine_similarity;
///
/// let s = cosine_similarity(&[1.0, 0.0], &[1.0, 1.0]).unwrap();
/// assert!((s - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
/// ```
#[expect(clippy::float_arithmetic, reason = "dot product and norms")]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, SimilarityError> {
    if a.is_empty() || b.is_empty() {
        return Err(SimilarityError::Empty);
    }
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let (dot, norm_a, norm_b) = a.iter().zip(b).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );
    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if !denominator.is_normal() {
        return Err(SimilarityError::ZeroNorm);
    }
    Ok(dot / denominator)
}

/// Scores semantic similarity through a borrowed embedding provider.
///
/// The provider is constructed once by the host and shared; the scorer never
/// creates or reloads it.
#[derive(Debug)]
pub struct SemanticScorer<'p, P: ?Sized> {
    provider: &'p P,
}

impl<'p, P> SemanticScorer<'p, P>
where
    P: TextProcessor<Output = Box<[f32]>> + ?Sized,
{
    #[must_use]
    pub fn new(provider: &'p P) -> Self {
        Self { provider }
    }

    /// Cosine similarity of the two texts clamped to `[0, 1]`, or `0.0` when
    /// an embedding cannot be obtained or compared.
    pub fn score(&self, generated: &str, reference: &str) -> f64 {
        match self.try_score(generated, reference) {
            Ok(similarity) => similarity.clamp(0.0, 1.0),
            Err(err) => {
                warn!(error = %err, "semantic similarity unavailable; scoring 0");
                0.0
            }
        }
    }

    fn try_score(&self, generated: &str, reference: &str) -> Result<f64, ScoreFailure<P::Error>> {
        let left = self.provider.process(generated).map_err(ScoreFailure::Provider)?;
        let right = self.provider.process(reference).map_err(ScoreFailure::Provider)?;
        cosine_similarity(&left, &right).map_err(ScoreFailure::Similarity)
    }
}

#[derive(Debug, Error)]
enum ScoreFailure<E: std::error::Error + 'static> {
    #[error("embedding provider failed: {0}")]
    Provider(#[source] E),
    #[error(transparent)]
    Similarity(SimilarityError),
}
