use serde::{Deserialize, Serialize};

/// A generated note and the human-written reference it is scored against.
///
/// # Examples
///
/// ```
/// use note_eval::api::TextPair;
///
/// let pair = TextPair::new("Plan: rest and fluids.", "Plan: fluids, rest.");
/// assert_eq!(pair.reference, "Plan: fluids, rest.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPair {
    pub generated: String,
    pub reference: String,
}

impl TextPair {
    /// Create a pair from any string-like inputs.
    #[must_use]
    pub fn new(generated: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            generated: generated.into(),
            reference: reference.into(),
        }
    }
}

/// Scores for one generated/reference pair, each rounded to three decimals.
///
/// `rouge1`, `rouge_l`, `bleu` and `semantic` lie in `[0, 1]`.
/// `length_ratio` is the generated character count over the reference
/// character count (denominator at least one) and is unbounded above.
///
/// Serialises with the field names `rouge1`, `rougeL`, `bleu`, `semantic`
/// and `lengthRatio`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResult {
    pub rouge1: f64,
    pub rouge_l: f64,
    pub bleu: f64,
    pub semantic: f64,
    pub length_ratio: f64,
}

/// Largest `|1 - length_ratio|` still considered a calibrated length.
pub const LENGTH_TOLERANCE: f64 = 0.2;

impl MetricResult {
    /// Unweighted mean of the four quality metrics. The length ratio is not
    /// a quality signal and is excluded.
    ///
    /// # Examples
    ///
    /// ```
    /// use note_eval::MetricResult;
    ///
    /// let m = MetricResult { rouge1: 1.0, rouge_l: 0.5, bleu: 0.5, semantic: 0.0, length_ratio: 3.0 };
    /// assert_eq!(m.composite(), 0.5);
    /// ```
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "arithmetic mean")]
    pub fn composite(&self) -> f64 {
        (self.rouge1 + self.rouge_l + self.bleu + self.semantic) / 4.0
    }

    /// Whether the generated length is within [`LENGTH_TOLERANCE`] of the
    /// reference length.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "distance from unit ratio")]
    pub fn is_length_calibrated(&self) -> bool {
        (1.0 - self.length_ratio).abs() < LENGTH_TOLERANCE
    }
}

/// Diagnostic record of one evaluation: the inputs and their scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationTrace {
    #[serde(flatten)]
    pub pair: TextPair,
    pub metrics: MetricResult,
}

/// Scores a generated note against a reference.
pub trait NoteEvaluator {
    /// Error type returned when the inputs are rejected.
    type Error: std::error::Error + Send + Sync;

    /// Score `generated` against `reference`.
    ///
    /// # Errors
    ///
    /// Returns an error if either input is rejected.
    fn evaluate(&self, generated: &str, reference: &str) -> Result<MetricResult, Self::Error>;

    /// Score a pair and keep the inputs alongside the result.
    ///
    /// # Errors
    ///
    /// Returns an error if either input is rejected.
    fn trace(&self, pair: &TextPair) -> Result<EvaluationTrace, Self::Error> {
        self.evaluate(&pair.generated, &pair.reference)
            .map(|metrics| EvaluationTrace {
                pair: pair.clone(),
                metrics,
            })
    }
}
