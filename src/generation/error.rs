//! Error types for the generation drivers

use super::flashcard::FlashcardDeck;
use crate::text::chunking::ChunkingError;

/// Failures surfaced by a generation collaborator or by the drivers around it
#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("No content to process")]
    EmptyInput,

    #[error("Content blocked by safety filters: {0}")]
    Safety(String),

    #[error("Generation service error: {0}")]
    Service(String),

    #[error("Malformed generator output: {0}")]
    MalformedOutput(String),

    #[error("No flashcards could be generated from the text")]
    NoFlashcards,

    /// A later chunk failed; cards from the chunks before it are kept
    #[error("Flashcard generation stopped early: {source}")]
    PartialDeck {
        deck: FlashcardDeck,
        #[source]
        source: Box<GenerationError>,
    },

    #[error("Chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, GenerationError>;

impl GenerationError {
    pub fn safety<S: Into<String>>(msg: S) -> Self {
        Self::Safety(msg.into())
    }

    pub fn service<S: Into<String>>(msg: S) -> Self {
        Self::Service(msg.into())
    }

    pub fn malformed_output<S: Into<String>>(msg: S) -> Self {
        Self::MalformedOutput(msg.into())
    }

    /// Classify a raw service message; safety rejections mention `SAFETY`
    pub fn from_service_message<S: Into<String>>(msg: S) -> Self {
        let msg = msg.into();
        if msg.contains("SAFETY") {
            Self::Safety(msg)
        } else {
            Self::Service(msg)
        }
    }

    /// Whether the content was rejected rather than the call failing
    pub fn is_safety(&self) -> bool {
        match self {
            Self::Safety(_) => true,
            Self::PartialDeck { source, .. } => source.is_safety(),
            _ => false,
        }
    }

    /// Cards generated before the failure, if any
    pub fn partial_deck(&self) -> Option<&FlashcardDeck> {
        match self {
            Self::PartialDeck { deck, .. } => Some(deck),
            _ => None,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyInput => "input",
            Self::Safety(_) => "safety",
            Self::Service(_) => "service",
            Self::MalformedOutput(_) => "output",
            Self::NoFlashcards => "output",
            Self::PartialDeck { source, .. } => source.category(),
            Self::Chunking(_) => "chunking",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedOutput(err.to_string())
    }
}
