//! Word-bounded text chunking for language-model context windows
//!
//! Long input is split into paragraph-aligned chunks between a minimum and a
//! maximum word count, so that each chunk can be sent to the generation
//! service on its own and the results stitched back together afterwards.

pub mod chunker;
pub mod config;
pub mod error;
pub mod types;

// Re-export main public interfaces
pub use chunker::{WordChunker, split_text_for_flashcards, split_text_into_chunks};
pub use config::{
    ChunkingStatistics, FLASHCARD_MAX_CHUNK_WORDS, MAX_CHUNK_WORDS, MIN_CHUNK_WORDS,
    WordChunkingConfig,
};
pub use error::{ChunkingError, Result};
pub use types::{ChunkType, TextChunk};
