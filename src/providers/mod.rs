//! Provider interfaces for text embeddings and the generation backend
//! catalogue.
//!
//! Defines the `TextProcessor` trait and the `EmbeddingProvider` alias
//! consumed by the semantic similarity scorer.

use std::sync::Arc;

pub mod catalogue;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use catalogue::GenerationBackend;

/// Processes text to produce a structured, thread-safe output.
///
/// Embedding providers implement this trait with `Output = Box<[f32]>`.
pub trait TextProcessor {
    /// Structured result returned by the processor.
    ///
    /// Outputs must be `Send + Sync + 'static` so they can be safely shared
    /// across threads and stored in trait objects without borrowing.
    type Output: Send + Sync + 'static;
    /// Error type returned when processing fails.
    ///
    /// Errors must implement `std::error::Error` and be `Send + Sync + 'static`
    /// to propagate cleanly across threads and outlive the processor.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Process the supplied text.
    ///
    /// # Errors
    ///
    /// Returns an error if processing fails.
    fn process(&self, input: &str) -> Result<Self::Output, Self::Error>;
}

/// A single provider handle shared by every evaluation in the process.
impl<T: TextProcessor + ?Sized> TextProcessor for Arc<T> {
    type Output = T::Output;
    type Error = T::Error;

    fn process(&self, input: &str) -> Result<Self::Output, Self::Error> {
        (**self).process(input)
    }
}

/// Provides fixed-length vector embeddings.
pub type EmbeddingProvider<E> =
    dyn TextProcessor<Output = Box<[f32]>, Error = E> + Send + Sync + 'static;
