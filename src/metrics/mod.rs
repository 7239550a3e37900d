//! Pure CPU scorers for lexical and n-gram overlap.

pub mod bleu;
pub mod rouge;
pub mod text;

pub use bleu::bleu;
pub use rouge::{RougeScores, rouge};
