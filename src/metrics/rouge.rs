//! Lexical overlap scores: ROUGE-1 and ROUGE-L F1.
//!
//! ROUGE-1 counts every generated token that occurs anywhere in the
//! reference. This is set membership, so a reference token can match any
//! number of generated occurrences; recall is capped at one so repeated
//! tokens cannot push the score past one. ROUGE-L uses the length of the longest
//! common subsequence of the two token sequences.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::text::tokenize;

/// F1 scores for unigram and longest-common-subsequence overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RougeScores {
    pub rouge1: f64,
    pub rouge_l: f64,
}

/// Score `generated` against `reference`.
///
/// # Examples
///
/// ```
/// use note_eval::metrics::rouge::rouge;
///
/// let scores = rouge("patient reports mild headache", "patient reports headache");
/// assert!((scores.rouge1 - 0.857).abs() < 1e-3);
/// ```
#[must_use]
pub fn rouge(generated: &str, reference: &str) -> RougeScores {
    let generated = tokenize(generated);
    let reference = tokenize(reference);

    let vocabulary: HashSet<&str> = reference.iter().map(String::as_str).collect();
    let overlap = generated
        .iter()
        .filter(|token| vocabulary.contains(token.as_str()))
        .count();

    RougeScores {
        rouge1: f1(overlap, generated.len(), reference.len()),
        rouge_l: f1(
            lcs_length(&generated, &reference),
            generated.len(),
            reference.len(),
        ),
    }
}

/// Harmonic mean of precision and recall for `matched` shared tokens.
///
/// Recall is capped at `1.0`. Returns `0.0` when either sequence is empty or
/// nothing matched.
#[expect(clippy::float_arithmetic, reason = "precision and recall are ratios")]
#[expect(clippy::cast_precision_loss, reason = "token counts fit in f64")]
fn f1(matched: usize, generated_len: usize, reference_len: usize) -> f64 {
    if generated_len == 0 || reference_len == 0 {
        return 0.0;
    }
    let precision = matched as f64 / generated_len as f64;
    let recall = (matched as f64 / reference_len as f64).min(1.0);
    let sum = precision + recall;
    if sum > 0.0 {
        2.0 * precision * recall / sum
    } else {
        0.0
    }
}

/// Length of the longest common subsequence of `a` and `b`.
///
/// Fills the dynamic-programming table one row at a time; each row depends
/// only on its predecessor.
pub(crate) fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let mut previous = vec![0_usize; b.len() + 1];
    for x in a {
        let mut row = Vec::with_capacity(previous.len());
        row.push(0);
        let mut left = 0;
        for ((y, &diagonal), &up) in b.iter().zip(&previous).zip(previous.iter().skip(1)) {
            left = if x == y { diagonal + 1 } else { up.max(left) };
            row.push(left);
        }
        previous = row;
    }
    previous.last().copied().unwrap_or(0)
}
