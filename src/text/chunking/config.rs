//! Configuration and statistics for word-bounded text chunking

use super::error::{ChunkingError, Result};
use super::types::ChunkType;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Lower bound used when merging small chunks upward
pub const MIN_CHUNK_WORDS: usize = 1000;
/// Upper bound for a chunk sent to the formatter
pub const MAX_CHUNK_WORDS: usize = 2000;
/// Upper bound for a chunk sent to flashcard generation
pub const FLASHCARD_MAX_CHUNK_WORDS: usize = 1500;

/// Configuration for word-bounded chunking
///
/// Fields missing from the environment fall back to the document preset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WordChunkingConfig {
    /// Minimum words per chunk (for merging small chunks)
    pub min_chunk_words: usize,
    /// Maximum words per chunk
    pub max_chunk_words: usize,
    /// Split paragraphs larger than the maximum at sentence boundaries
    pub enable_sentence_splitting: bool,
    /// Merge initial chunks upward until they reach the minimum
    pub enable_chunk_merging: bool,
}

impl Default for WordChunkingConfig {
    fn default() -> Self {
        Self::for_document()
    }
}

impl WordChunkingConfig {
    /// Configuration used when formatting a document into HTML
    pub fn for_document() -> Self {
        Self {
            min_chunk_words: MIN_CHUNK_WORDS,
            max_chunk_words: MAX_CHUNK_WORDS,
            enable_sentence_splitting: true,
            enable_chunk_merging: true,
        }
    }

    /// Configuration used when generating flashcards: paragraph packing only
    pub fn for_flashcards() -> Self {
        Self {
            min_chunk_words: FLASHCARD_MAX_CHUNK_WORDS / 2,
            max_chunk_words: FLASHCARD_MAX_CHUNK_WORDS,
            enable_sentence_splitting: false,
            enable_chunk_merging: false,
        }
    }

    /// Document preset with custom bounds
    pub fn with_limits(min_chunk_words: usize, max_chunk_words: usize) -> Self {
        Self {
            min_chunk_words,
            max_chunk_words,
            ..Self::for_document()
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_chunk_words == 0 {
            return Err("max_chunk_words must be greater than 0".to_string());
        }

        if self.min_chunk_words > self.max_chunk_words {
            return Err(format!(
                "min_chunk_words ({}) must not exceed max_chunk_words ({})",
                self.min_chunk_words, self.max_chunk_words
            ));
        }

        Ok(())
    }

    /// Load from environment variables, e.g. `CHUNK_MAX_CHUNK_WORDS` for prefix `CHUNK_`
    pub fn from_env(prefix: &str) -> Result<Self> {
        Self::from_vars(prefix, std::env::vars())
    }

    pub fn from_vars<I>(prefix: &str, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::prefixed(prefix).from_iter(vars)?;
        config.validate().map_err(ChunkingError::configuration)?;
        Ok(config)
    }
}

/// Statistics for the last chunking operation
#[derive(Debug, Clone, Default)]
pub struct ChunkingStatistics {
    /// Total processing time
    pub total_processing_time: Duration,

    /// Input text statistics
    pub input_word_count: usize,
    pub detected_paragraph_count: usize,
    pub oversized_paragraph_count: usize,

    /// Chunks after the paragraph pass
    pub initial_chunk_count: usize,
    /// Whether a small trailing chunk was folded into the previous one
    pub leftover_folded: bool,

    /// Output chunk statistics
    pub total_chunks_created: usize,
    pub whole_text_chunks: usize,
    pub paragraph_chunks: usize,
    pub sentence_split_chunks: usize,
    pub merged_chunks: usize,

    /// Word statistics
    pub total_words_emitted: usize,
    pub avg_words_per_chunk: f32,
    pub max_words_in_chunk: usize,
    pub min_words_in_chunk: usize,
}

impl ChunkingStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_total_timing(&mut self) -> Instant {
        Instant::now()
    }

    pub fn finish_total_timing(&mut self, start: Instant) {
        self.total_processing_time = start.elapsed();
    }

    pub fn record_input_stats(&mut self, word_count: usize) {
        self.input_word_count = word_count;
    }

    /// Record chunk creation by type
    pub fn record_chunk_creation(&mut self, chunk_type: &ChunkType) {
        self.total_chunks_created += 1;
        match chunk_type {
            ChunkType::WholeText => self.whole_text_chunks += 1,
            ChunkType::Paragraphs => self.paragraph_chunks += 1,
            ChunkType::SentenceSplit => self.sentence_split_chunks += 1,
            ChunkType::Merged => self.merged_chunks += 1,
        }
    }

    /// Record word statistics for a chunk
    pub fn record_word_stats(&mut self, word_count: usize) {
        self.total_words_emitted += word_count;

        if self.total_chunks_created <= 1 || word_count > self.max_words_in_chunk {
            self.max_words_in_chunk = word_count;
        }

        if self.total_chunks_created <= 1 || word_count < self.min_words_in_chunk {
            self.min_words_in_chunk = word_count;
        }
    }

    /// Calculate derived metrics (call this after all processing is complete)
    pub fn calculate_derived_metrics(&mut self) {
        if self.total_chunks_created > 0 {
            self.avg_words_per_chunk =
                self.total_words_emitted as f32 / self.total_chunks_created as f32;
        }
    }

    /// Get summary as string for logging
    pub fn summary(&self) -> String {
        format!(
            "Chunking Stats: {} words, {} paragraphs ({} oversized) -> {} initial -> {} chunks \
            ({:.1} avg words/chunk, min {}, max {}) in {:.2}ms",
            self.input_word_count,
            self.detected_paragraph_count,
            self.oversized_paragraph_count,
            self.initial_chunk_count,
            self.total_chunks_created,
            self.avg_words_per_chunk,
            self.min_words_in_chunk,
            self.max_words_in_chunk,
            self.total_processing_time.as_secs_f64() * 1000.0,
        )
    }
}
