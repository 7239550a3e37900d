//! Single-pair evaluation combining lexical, n-gram and semantic scores.
//!
//! ROUGE and BLEU are pure CPU work; the embedding provider is the only call
//! that may block. The scorers are independent and their outputs are merged
//! with the length ratio into one [`MetricResult`], rounded to three decimals.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use tracing::debug;

use crate::{
    api::{MetricResult, NoteEvaluator},
    metrics::{bleu, rouge},
    providers::TextProcessor,
    semantic::SemanticScorer,
};

/// Inputs rejected before scoring.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EvaluationError {
    /// Generated note was empty or whitespace only.
    #[error("generated note is required")]
    EmptyGenerated,
    /// Reference note was empty or whitespace only.
    #[error("reference note is required")]
    EmptyReference,
}

/// Scores generated notes against references using an embedding provider.
///
/// Pass an `Arc` to share one provider between several evaluators or
/// threads.
///
/// # Examples
///
/// ```
/// use note_eval::{Evaluator, NoteEvaluator};
/// use note_eval::tests::support::FixedEmbedding;
///
/// let note = "patient reports mild headache";
/// let reference = "patient reports headache";
/// let provider = FixedEmbedding::new()
///     .with(note, &[0.6, 0.8])
///     .with(reference, &[0.6, 0.8]);
/// let metrics = Evaluator::new(provider).evaluate(note, reference).unwrap();
/// assert_eq!(metrics.rouge1, 0.857);
/// assert_eq!(metrics.semantic, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator<P> {
    provider: P,
}

impl<P> Evaluator<P>
where
    P: TextProcessor<Output = Box<[f32]>>,
{
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The embedding provider used for semantic similarity.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Score any pair of texts without input validation.
    ///
    /// An empty generated note scores zero on every lexical and n-gram metric
    /// against a non-empty reference, and the length ratio uses a
    /// denominator of at least one.
    #[must_use]
    pub fn metrics(&self, generated: &str, reference: &str) -> MetricResult {
        let lexical = rouge(generated, reference);
        let bleu = bleu(generated, reference);
        let semantic = SemanticScorer::new(&self.provider).score(generated, reference);
        let length_ratio = length_ratio(generated, reference);
        debug!(
            rouge1 = lexical.rouge1,
            rouge_l = lexical.rouge_l,
            bleu,
            semantic,
            length_ratio,
            "scored note"
        );
        MetricResult {
            rouge1: round3(lexical.rouge1),
            rouge_l: round3(lexical.rouge_l),
            bleu: round3(bleu),
            semantic: round3(semantic),
            length_ratio: round3(length_ratio),
        }
    }
}

impl<P> NoteEvaluator for Evaluator<P>
where
    P: TextProcessor<Output = Box<[f32]>>,
{
    type Error = EvaluationError;

    fn evaluate(&self, generated: &str, reference: &str) -> Result<MetricResult, Self::Error> {
        if generated.trim().is_empty() {
            return Err(EvaluationError::EmptyGenerated);
        }
        if reference.trim().is_empty() {
            return Err(EvaluationError::EmptyReference);
        }
        Ok(self.metrics(generated, reference))
    }
}

/// Generated character count over reference character count, the latter
/// floored at one.
#[expect(clippy::float_arithmetic, reason = "ratio of lengths")]
#[expect(clippy::cast_precision_loss, reason = "character counts fit in f64")]
fn length_ratio(generated: &str, reference: &str) -> f64 {
    generated.chars().count() as f64 / reference.chars().count().max(1) as f64
}

/// Round the exact decimal value of `value` to three places, ties away from
/// zero. Non-finite values pass through unchanged.
#[expect(clippy::float_arithmetic, reason = "rescale the rounded mantissa")]
#[expect(clippy::cast_precision_loss, reason = "rounded mantissa is far below 2^53")]
#[expect(clippy::cast_possible_wrap, reason = "scale is at most 28")]
fn round3(value: f64) -> f64 {
    let Some(exact) = Decimal::from_f64_retain(value) else {
        return value;
    };
    let rounded = exact.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);
    rounded.mantissa() as f64 / 10_f64.powi(rounded.scale() as i32)
}
