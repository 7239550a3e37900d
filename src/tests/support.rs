//! Tolerance comparison and a table-driven embedding provider.

use std::collections::HashMap;

use thiserror::Error;

use crate::providers::TextProcessor;

#[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
#[must_use]
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

/// Error returned by [`FixedEmbedding`] for texts missing from its table.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no embedding registered for {0:?}")]
pub struct UnknownText(pub String);

/// Embedding provider answering from a fixed text-to-vector table.
///
/// # Examples
///
/// ```
/// use note_eval::tests::support::FixedEmbedding;
/// use note_eval::TextProcessor;
///
/// let provider = FixedEmbedding::new().with("fever", &[1.0, 0.0]);
/// assert_eq!(provider.process("fever").unwrap().to_vec(), vec![1.0_f32, 0.0]);
/// assert!(provider.process("cough").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedEmbedding {
    table: HashMap<String, Vec<f32>>,
}

impl FixedEmbedding {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the vector returned for `text`.
    #[must_use]
    pub fn with(mut self, text: &str, vector: &[f32]) -> Self {
        self.table.insert(text.to_owned(), vector.to_vec());
        self
    }
}

impl TextProcessor for FixedEmbedding {
    type Output = Box<[f32]>;
    type Error = UnknownText;

    fn process(&self, input: &str) -> Result<Self::Output, Self::Error> {
        self.table
            .get(input)
            .map(|v| v.clone().into_boxed_slice())
            .ok_or_else(|| UnknownText(input.to_owned()))
    }
}
