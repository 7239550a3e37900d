//! Tokenisation shared by the lexical and n-gram scorers.
//!
//! Two variants exist. [`tokenize`] lower-cases and splits on runs of
//! whitespace, keeping punctuation attached to words and keeping the empty
//! edge tokens produced by leading or trailing whitespace. [`normalize_tokens`]
//! additionally strips everything that is not a lowercase ASCII letter, a
//! digit, or whitespace so punctuation cannot break n-gram matches.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "static pattern is valid")]
    Regex::new(r"\s+").expect("valid whitespace regex")
});

static NON_ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "static pattern is valid")]
    Regex::new(r"[^a-z0-9\s]").expect("valid character class regex")
});

/// Split text into lowercase tokens on runs of whitespace.
///
/// Empty input yields a single empty token, and leading or trailing
/// whitespace yields an empty token at that edge.
///
/// # Examples
///
/// ```
/// use note_eval::metrics::text::tokenize;
///
/// assert_eq!(tokenize("Patient  reports, Headache"), vec!["patient", "reports,", "headache"]);
/// assert_eq!(tokenize(""), vec![""]);
/// ```
#[must_use]
pub fn tokenize(input: &str) -> Vec<String> {
    let lower = input.to_lowercase();
    WHITESPACE_RUN.split(&lower).map(str::to_owned).collect()
}

/// Split text into lowercase alphanumeric tokens.
///
/// Characters other than `a-z`, `0-9` and whitespace are removed before
/// splitting. Returns an empty vector when nothing survives.
///
/// # Examples
///
/// ```
/// use note_eval::metrics::text::normalize_tokens;
///
/// assert_eq!(normalize_tokens("BP: 120/80, stable."), vec!["bp", "12080", "stable"]);
/// assert!(normalize_tokens(" ... ").is_empty());
/// ```
#[must_use]
pub fn normalize_tokens(input: &str) -> Vec<String> {
    let lower = input.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lower, "")
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}
