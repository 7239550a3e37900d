//! Core library entry point.
//!
//! Scores a generated clinical note against a human-written reference with
//! ROUGE-1, ROUGE-L, smoothed BLEU-4 and embedding cosine similarity, and
//! ranks several candidates by their composite score.

pub mod api;
#[cfg(feature = "provider-api")]
pub mod api_embedding;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod embedding;
pub mod evaluator;
pub mod leaderboard;
pub mod metrics;
pub mod providers;
pub mod semantic;

pub use api::{EvaluationTrace, MetricResult, NoteEvaluator, TextPair};
#[cfg(feature = "provider-api")]
pub use api_embedding::{ApiEmbedding, ApiEmbeddingError};
#[cfg(feature = "cli")]
pub use cli::NotevalArgs;
pub use config::{ConfigError, EmbeddingConfig};
pub use embedding::{ConfiguredEmbedding, EmbeddingError};
pub use evaluator::{EvaluationError, Evaluator};
pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardRow, Metric, MetricBests, rank};
pub use providers::{EmbeddingProvider, GenerationBackend, TextProcessor};
pub use semantic::{SemanticScorer, SimilarityError, cosine_similarity};

pub mod tests;
