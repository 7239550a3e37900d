//! Sentence-level BLEU-4 with additive smoothing and a brevity penalty.
//!
//! Both texts pass through [`normalize_tokens`]. For each order `n` in
//! `1..=4` the clipped n-gram matches are divided by the number of candidate
//! n-grams (at least one). A zero precision is replaced by
//! `1 / (total + 1)` so the geometric mean stays defined. Candidates no
//! longer than the reference are discounted by `exp(1 - r / c)`.

use std::collections::HashMap;

use super::text::normalize_tokens;

/// Highest n-gram order included in the geometric mean.
pub const MAX_ORDER: usize = 4;

/// Score `generated` against `reference`.
///
/// Returns `0.0` when either text has no tokens after normalisation.
///
/// # Examples
///
/// ```
/// use note_eval::metrics::bleu::bleu;
///
/// let note = "patient denies chest pain today";
/// assert!((bleu(note, note) - 1.0).abs() < 1e-12);
/// assert_eq!(bleu("", note), 0.0);
/// ```
#[must_use]
pub fn bleu(generated: &str, reference: &str) -> f64 {
    let candidate = normalize_tokens(generated);
    let reference = normalize_tokens(reference);
    if candidate.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let log_sum: f64 = (1..=MAX_ORDER)
        .map(|order| smoothed_precision(&candidate, &reference, order).ln())
        .sum();

    geometric_mean(log_sum) * brevity_penalty(candidate.len(), reference.len())
}

/// Clipped precision at `order`, smoothed when no n-gram matched.
#[expect(clippy::float_arithmetic, reason = "precision is a ratio")]
#[expect(clippy::cast_precision_loss, reason = "n-gram counts fit in f64")]
fn smoothed_precision(candidate: &[String], reference: &[String], order: usize) -> f64 {
    let candidate_counts = ngram_counts(candidate, order);
    let reference_counts = ngram_counts(reference, order);
    let matches: usize = candidate_counts
        .iter()
        .map(|(gram, &count)| count.min(reference_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let total = (candidate.len() + 1).saturating_sub(order).max(1);

    if matches == 0 {
        1.0 / (total as f64 + 1.0)
    } else {
        matches as f64 / total as f64
    }
}

/// Occurrence counts of every contiguous window of `order` tokens.
fn ngram_counts(tokens: &[String], order: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    for window in tokens.windows(order) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

#[expect(clippy::float_arithmetic, reason = "mean of log precisions")]
#[expect(clippy::cast_precision_loss, reason = "order is a small constant")]
fn geometric_mean(log_sum: f64) -> f64 {
    (log_sum / MAX_ORDER as f64).exp()
}

/// Penalty for candidates not strictly longer than the reference.
///
/// `candidate_len` must be non-zero.
#[expect(clippy::float_arithmetic, reason = "penalty is exponential in the length ratio")]
#[expect(clippy::cast_precision_loss, reason = "token counts fit in f64")]
fn brevity_penalty(candidate_len: usize, reference_len: usize) -> f64 {
    if candidate_len > reference_len {
        1.0
    } else {
        (1.0 - reference_len as f64 / candidate_len as f64).exp()
    }
}
