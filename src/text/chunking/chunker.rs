//! Word chunker: paragraph packing followed by upward merging of small chunks

use super::{
    config::{ChunkingStatistics, WordChunkingConfig},
    error::{ChunkingError, Result},
    types::{ChunkType, TextChunk},
};
use crate::text::{SentenceSplitter, split_paragraphs, word_count};
use tracing::{debug, info, warn};

/// Chunk under construction, carrying its word count
#[derive(Debug, Clone)]
struct PendingChunk {
    content: String,
    words: usize,
    chunk_type: ChunkType,
}

impl PendingChunk {
    fn new(content: String, words: usize, chunk_type: ChunkType) -> Self {
        Self {
            content,
            words,
            chunk_type,
        }
    }

    fn append_paragraph(&mut self, text: &str, words: usize) {
        if !self.content.is_empty() {
            self.content.push_str("\n\n");
        }
        self.content.push_str(text);
        self.words += words;
    }
}

/// Splits text into word-bounded chunks for the generation service
pub struct WordChunker {
    config: WordChunkingConfig,
    sentence_splitter: SentenceSplitter,
    statistics: ChunkingStatistics,
}

impl Default for WordChunker {
    fn default() -> Self {
        Self::from_valid_config(WordChunkingConfig::for_document())
    }
}

impl WordChunker {
    /// Create a new chunker, validating the configuration
    pub fn new(config: WordChunkingConfig) -> Result<Self> {
        config.validate().map_err(ChunkingError::configuration)?;
        Ok(Self::from_valid_config(config))
    }

    /// Chunker for the flashcard flow
    pub fn for_flashcards() -> Self {
        Self::from_valid_config(WordChunkingConfig::for_flashcards())
    }

    fn from_valid_config(config: WordChunkingConfig) -> Self {
        Self {
            config,
            sentence_splitter: SentenceSplitter::default(),
            statistics: ChunkingStatistics::new(),
        }
    }

    /// Split text into ordered chunks.
    ///
    /// Text within the maximum is returned unchanged as a single chunk. Larger
    /// text is packed paragraph by paragraph, oversized paragraphs are split by
    /// sentence, and the resulting chunks are merged upward until each reaches
    /// the minimum. Never fails; the word sequence of the input is preserved.
    pub fn split(&mut self, text: &str) -> Vec<TextChunk> {
        self.statistics = ChunkingStatistics::new();
        let total_start = self.statistics.start_total_timing();

        let total_words = word_count(text);
        self.statistics.record_input_stats(total_words);

        if total_words <= self.config.max_chunk_words {
            debug!(
                "Text of {} words fits in one chunk (max {})",
                total_words, self.config.max_chunk_words
            );
            let chunks = self.finalize(vec![PendingChunk::new(
                text.to_string(),
                total_words,
                ChunkType::WholeText,
            )]);
            self.statistics.finish_total_timing(total_start);
            return chunks;
        }

        // Pass A: pack paragraphs up to the maximum
        let initial_chunks = self.partition_paragraphs(text);
        self.statistics.initial_chunk_count = initial_chunks.len();
        info!(
            "Partitioned {} paragraphs into {} initial chunks",
            self.statistics.detected_paragraph_count,
            initial_chunks.len()
        );

        // Pass B: merge small chunks upward
        let pending = if self.config.enable_chunk_merging {
            self.merge_small_chunks(initial_chunks)
        } else {
            initial_chunks
        };

        let chunks = self.finalize(pending);
        self.statistics.finish_total_timing(total_start);
        debug!("{}", self.statistics.summary());
        chunks
    }

    /// Split and return only the chunk contents
    pub fn split_to_strings(&mut self, text: &str) -> Vec<String> {
        self.split(text)
            .into_iter()
            .map(TextChunk::into_content)
            .collect()
    }

    fn partition_paragraphs(&mut self, text: &str) -> Vec<PendingChunk> {
        let paragraphs = split_paragraphs(text);
        self.statistics.detected_paragraph_count = paragraphs.len();
        let max = self.config.max_chunk_words;

        let mut initial_chunks = Vec::new();
        let mut current = PendingChunk::new(String::new(), 0, ChunkType::Paragraphs);

        for paragraph in paragraphs {
            let paragraph_words = word_count(paragraph);

            if paragraph_words > max {
                self.statistics.oversized_paragraph_count += 1;
                Self::flush(&mut current, &mut initial_chunks);

                if self.config.enable_sentence_splitting {
                    debug!(
                        "Paragraph too large ({} words), applying sentence splitting",
                        paragraph_words
                    );
                    initial_chunks.extend(self.split_paragraph_by_sentences(paragraph));
                } else {
                    debug!(
                        "Paragraph too large ({} words), kept whole (sentence splitting disabled)",
                        paragraph_words
                    );
                    initial_chunks.push(PendingChunk::new(
                        paragraph.trim().to_string(),
                        paragraph_words,
                        ChunkType::Paragraphs,
                    ));
                }
                continue;
            }

            if current.words + paragraph_words > max {
                Self::flush(&mut current, &mut initial_chunks);
                current = PendingChunk::new(
                    paragraph.to_string(),
                    paragraph_words,
                    ChunkType::Paragraphs,
                );
            } else {
                current.append_paragraph(paragraph, paragraph_words);
            }
        }
        Self::flush(&mut current, &mut initial_chunks);

        initial_chunks
    }

    /// Move the buffer into `chunks` (trimmed) if it has any content
    fn flush(current: &mut PendingChunk, chunks: &mut Vec<PendingChunk>) {
        let chunk_type = current.chunk_type;
        let taken = std::mem::replace(current, PendingChunk::new(String::new(), 0, chunk_type));
        let trimmed = taken.content.trim();
        if !trimmed.is_empty() {
            chunks.push(PendingChunk::new(
                trimmed.to_string(),
                taken.words,
                taken.chunk_type,
            ));
        }
    }

    /// Greedily pack sentences of an oversized paragraph up to the maximum.
    ///
    /// Chunks are slices of the paragraph, so the original spacing between
    /// sentences is kept inside a chunk. Sentences end on word boundaries, so
    /// a chunk's word count is the sum of its sentences' counts.
    fn split_paragraph_by_sentences(&self, paragraph: &str) -> Vec<PendingChunk> {
        let max = self.config.max_chunk_words;
        let mut chunks = Vec::new();
        let mut start = 0;
        let mut end = 0;
        let mut words = 0;

        for span in self.sentence_splitter.split_word_spans(paragraph) {
            let sentence_words = word_count(&paragraph[span.clone()]);

            if words > 0 && words + sentence_words > max {
                chunks.push(PendingChunk::new(
                    paragraph[start..end].trim().to_string(),
                    words,
                    ChunkType::SentenceSplit,
                ));
                start = span.start;
                words = 0;
            }
            if sentence_words > max {
                warn!(
                    "Single sentence of {} words exceeds max_chunk_words={}, kept whole",
                    sentence_words, max
                );
            }
            words += sentence_words;
            end = span.end;
        }

        let remainder = paragraph[start..end].trim();
        if !remainder.is_empty() {
            chunks.push(PendingChunk::new(
                remainder.to_string(),
                words,
                ChunkType::SentenceSplit,
            ));
        }

        debug!("Split paragraph into {} sentence-based chunks", chunks.len());
        chunks
    }

    fn merge_small_chunks(&mut self, initial_chunks: Vec<PendingChunk>) -> Vec<PendingChunk> {
        if initial_chunks.len() <= 1 {
            return initial_chunks;
        }

        let min = self.config.min_chunk_words;
        let max = self.config.max_chunk_words;
        let mut merged: Vec<PendingChunk> = Vec::new();
        let mut buffer: Option<PendingChunk> = None;

        for chunk in initial_chunks {
            let full = match buffer.take() {
                None => chunk,
                Some(mut pending) => {
                    pending.append_paragraph(&chunk.content, chunk.words);
                    pending.chunk_type = ChunkType::Merged;
                    pending
                }
            };
            if full.words >= min {
                merged.push(full);
            } else {
                buffer = Some(full);
            }
        }

        if let Some(leftover) = buffer.filter(|b| !b.content.trim().is_empty()) {
            match merged.last_mut() {
                // leftover below half the minimum and the previous chunk has room
                Some(last) if leftover.words * 2 < min && last.words + leftover.words <= max => {
                    debug!(
                        "Folding trailing chunk of {} words into previous chunk of {} words",
                        leftover.words, last.words
                    );
                    last.append_paragraph(&leftover.content, leftover.words);
                    last.chunk_type = ChunkType::Merged;
                    self.statistics.leftover_folded = true;
                }
                _ => merged.push(leftover),
            }
        }

        merged.retain(|c| !c.content.trim().is_empty());
        merged
    }

    fn finalize(&mut self, pending: Vec<PendingChunk>) -> Vec<TextChunk> {
        let chunks: Vec<TextChunk> = pending
            .into_iter()
            .enumerate()
            .map(|(index, chunk)| {
                self.statistics.record_chunk_creation(&chunk.chunk_type);
                self.statistics.record_word_stats(chunk.words);
                TextChunk::new(chunk.content, chunk.words, chunk.chunk_type, index)
            })
            .collect();
        self.statistics.calculate_derived_metrics();
        chunks
    }

    /// Get configuration reference
    pub fn config(&self) -> &WordChunkingConfig {
        &self.config
    }

    /// Get statistics for the last chunking operation
    pub fn statistics(&self) -> &ChunkingStatistics {
        &self.statistics
    }
}

/// Split text with the document preset (1000 to 2000 words per chunk)
pub fn split_text_into_chunks(text: &str) -> Vec<String> {
    WordChunker::default().split_to_strings(text)
}

/// Split text with the flashcard preset (paragraph packing up to 1500 words)
pub fn split_text_for_flashcards(text: &str) -> Vec<String> {
    WordChunker::for_flashcards().split_to_strings(text)
}
