//! Known generation models and the backend that serves each one.
//!
//! Candidate notes are labelled by model id. The backend is resolved through
//! a fixed table rather than by inspecting the id.

use serde::{Deserialize, Serialize};

/// Service family that produced a generated note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationBackend {
    /// Hosted chat-completion models.
    OpenAi,
    /// Hosted Gemini models.
    Gemini,
    /// Hugging Face inference router.
    HuggingFace,
    /// In-process text-to-text model.
    Local,
}

const KNOWN_MODELS: &[(&str, GenerationBackend)] = &[
    ("gpt-4o", GenerationBackend::OpenAi),
    ("gpt-4o-mini", GenerationBackend::OpenAi),
    ("gpt-4-turbo-preview", GenerationBackend::OpenAi),
    ("gpt-3.5-turbo", GenerationBackend::OpenAi),
    ("gemini-1.5-pro", GenerationBackend::Gemini),
    ("gemini-1.5-flash", GenerationBackend::Gemini),
    ("gemini-pro", GenerationBackend::Gemini),
    ("local-t5", GenerationBackend::Local),
    ("katanemo/Arch-Router-1.5B", GenerationBackend::HuggingFace),
    ("katanemo/Arch-Router-1.5B:hf-inference", GenerationBackend::HuggingFace),
    ("HuggingFaceTB/SmolLM3-3B:hf-inference", GenerationBackend::HuggingFace),
];

impl GenerationBackend {
    /// Backend registered for `model`, if the id is known.
    ///
    /// # Examples
    ///
    /// ```
    /// use note_eval::providers::GenerationBackend;
    ///
    /// assert_eq!(GenerationBackend::lookup("gemini-pro"), Some(GenerationBackend::Gemini));
    /// assert_eq!(GenerationBackend::lookup("my-model"), None);
    /// ```
    #[must_use]
    pub fn lookup(model: &str) -> Option<Self> {
        KNOWN_MODELS
            .iter()
            .find(|(id, _)| *id == model)
            .map(|&(_, backend)| backend)
    }

    /// Backend for `model`, defaulting to [`GenerationBackend::OpenAi`] for
    /// unknown ids.
    #[must_use]
    pub fn for_model(model: &str) -> Self {
        Self::lookup(model).unwrap_or(Self::OpenAi)
    }

    /// Model ids registered for this backend, in table order.
    pub fn models(self) -> impl Iterator<Item = &'static str> {
        KNOWN_MODELS
            .iter()
            .filter(move |(_, backend)| *backend == self)
            .map(|&(id, _)| id)
    }

    /// Stable lowercase name used in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "open_ai",
            Self::Gemini => "gemini",
            Self::HuggingFace => "hugging_face",
            Self::Local => "local",
        }
    }
}
