//! Core data structures for word-bounded text chunking

/// A contiguous slice of input text sized for one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Chunk content
    pub content: String,
    /// Word count of `content`
    pub word_count: usize,
    /// How the chunk was produced
    pub chunk_type: ChunkType,
    /// Index of this chunk in the sequence
    pub chunk_index: usize,
}

impl TextChunk {
    pub fn new(content: String, word_count: usize, chunk_type: ChunkType, chunk_index: usize) -> Self {
        Self {
            content,
            word_count,
            chunk_type,
            chunk_index,
        }
    }

    /// Check if this chunk is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

/// Types of chunking steps that produced a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkType {
    /// Input was small enough to be sent as-is
    WholeText,
    /// One or more whole paragraphs
    Paragraphs,
    /// Sentences taken from a paragraph larger than the maximum
    SentenceSplit,
    /// Several initial chunks combined to reach the minimum
    Merged,
}

impl ChunkType {
    /// Check if the chunk is known to start and end on paragraph boundaries
    pub fn preserves_paragraphs(&self) -> bool {
        matches!(self, ChunkType::WholeText | ChunkType::Paragraphs)
    }

    /// Get a human-readable description of the chunk type
    pub fn description(&self) -> &'static str {
        match self {
            ChunkType::WholeText => "Whole text",
            ChunkType::Paragraphs => "Paragraph group",
            ChunkType::SentenceSplit => "Sentence-based split",
            ChunkType::Merged => "Merged small chunks",
        }
    }
}

impl std::fmt::Display for ChunkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_chunk_creation() {
        let chunk = TextChunk::new("نص قصير للاختبار".to_string(), 3, ChunkType::WholeText, 0);

        assert_eq!(chunk.content, "نص قصير للاختبار");
        assert_eq!(chunk.word_count, 3);
        assert_eq!(chunk.chunk_type, ChunkType::WholeText);
        assert_eq!(chunk.chunk_index, 0);
        assert!(!chunk.is_empty());
        assert_eq!(chunk.into_content(), "نص قصير للاختبار");
    }

    #[test]
    fn test_chunk_type_properties() {
        assert!(ChunkType::WholeText.preserves_paragraphs());
        assert!(ChunkType::Paragraphs.preserves_paragraphs());
        assert!(!ChunkType::Merged.preserves_paragraphs());
        assert!(!ChunkType::SentenceSplit.preserves_paragraphs());

        assert_eq!(format!("{}", ChunkType::Merged), "Merged small chunks");
        assert_eq!(ChunkType::SentenceSplit.description(), "Sentence-based split");
    }
}
