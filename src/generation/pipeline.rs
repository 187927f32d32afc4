//! Drivers that run a generation collaborator over a chunked document

use super::error::{GenerationError, Result};
use super::flashcard::{Flashcard, FlashcardDeck};
use super::{ContentGenerator, FlashcardSource, FormatRequest, OutputLanguage};
use crate::html::{HtmlMerger, html_to_text, strip_code_fences};
use crate::text::chunking::{ChunkingError, WordChunker, WordChunkingConfig};
use crate::util::id_generator::IdGenerator;
use futures::{Stream, TryStreamExt};
use tracing::{debug, info, warn};

/// Position of the chunk about to be processed (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

/// Append streamed pieces in order, stopping at the first error
pub async fn collect_pieces<S>(stream: S) -> Result<String>
where
    S: Stream<Item = Result<String>>,
{
    stream
        .try_fold(String::new(), |mut acc, piece| async move {
            acc.push_str(&piece);
            Ok(acc)
        })
        .await
}

/// Formats arbitrarily long text into one HTML document
pub struct DocumentFormatter<G> {
    generator: G,
    chunking: WordChunkingConfig,
    merger: HtmlMerger,
}

impl<G: ContentGenerator> DocumentFormatter<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            chunking: WordChunkingConfig::for_document(),
            merger: HtmlMerger::default(),
        }
    }

    pub fn with_config(
        generator: G,
        chunking: WordChunkingConfig,
        merger: HtmlMerger,
    ) -> Result<Self> {
        chunking.validate().map_err(ChunkingError::configuration)?;
        Ok(Self {
            generator,
            chunking,
            merger,
        })
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Format text as HTML.
    ///
    /// Text that fits in one chunk is sent as-is and the cleaned output is
    /// returned. Longer text is chunked, each chunk is formatted in order
    /// (reporting progress before each call) and the fragments are merged.
    /// The first generator error aborts the whole document.
    pub async fn format_document<F>(
        &self,
        text: &str,
        request: &FormatRequest,
        mut on_progress: F,
    ) -> Result<String>
    where
        F: FnMut(Progress),
    {
        if text.trim().is_empty() {
            debug!("Empty input, nothing to format");
            return Ok(String::new());
        }

        let mut chunker = WordChunker::new(self.chunking.clone())?;
        let chunks = chunker.split(text);
        if chunks.len() <= 1 {
            let html = collect_pieces(self.generator.format_text(text, request)).await?;
            return Ok(strip_code_fences(&html, "html"));
        }

        let total = chunks.len();
        info!(
            "Formatting document in {} chunks: {}",
            total,
            chunker.statistics().summary()
        );

        let mut fragments = Vec::with_capacity(total);
        for (i, chunk) in chunks.iter().enumerate() {
            on_progress(Progress {
                current: i + 1,
                total,
            });
            let html = collect_pieces(self.generator.format_text(&chunk.content, request))
                .await
                .inspect_err(|e| {
                    warn!(
                        "Formatting chunk {}/{} failed ({}): {}",
                        i + 1,
                        total,
                        e.category(),
                        e
                    )
                })?;
            fragments.push(strip_code_fences(&html, "html"));
        }

        Ok(self.merger.merge(&fragments))
    }

    /// Translate a formatted document; blank input gives an empty string
    pub async fn translate_document(&self, html: &str, target: OutputLanguage) -> Result<String> {
        if html.trim().is_empty() {
            return Ok(String::new());
        }
        debug!("Translating {} bytes of html to {}", html.len(), target);
        let translated = collect_pieces(self.generator.translate_html(html, target)).await?;
        Ok(strip_code_fences(&translated, "html"))
    }

    /// Apply chemical and scientific notation fixes to plain text
    pub async fn improve_text(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        let improved = collect_pieces(self.generator.improve_text(text)).await?;
        Ok(improved.trim().to_string())
    }
}

/// Builds a flashcard deck from a formatted document
pub struct FlashcardBuilder<S> {
    source: S,
    ids: IdGenerator,
    chunking: WordChunkingConfig,
}

impl<S: FlashcardSource> FlashcardBuilder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            ids: IdGenerator::default(),
            chunking: WordChunkingConfig::for_flashcards(),
        }
    }

    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Generate flashcards for every chunk of the document's text.
    ///
    /// Card ids are `{deck_id}-{chunk_index}-{card_index}`. When a chunk after
    /// the first cards were made fails, the error is
    /// [`GenerationError::PartialDeck`] carrying those cards.
    pub async fn build_deck<F>(&self, html: &str, mut on_progress: F) -> Result<FlashcardDeck>
    where
        F: FnMut(Progress),
    {
        let text = html_to_text(html);
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }

        let chunks = WordChunker::new(self.chunking.clone())?.split(&text);
        let deck_id = self.ids.next_id()?;
        let mut deck = FlashcardDeck::new(deck_id.to_string());

        let total = chunks.len();
        for (chunk_index, chunk) in chunks.iter().enumerate() {
            on_progress(Progress {
                current: chunk_index + 1,
                total,
            });
            let records = match self.source.generate_flashcards(&chunk.content).await {
                Ok(records) => records,
                Err(e) if deck.is_empty() => return Err(e),
                Err(e) => {
                    warn!(
                        "Chunk {}/{} failed, keeping {} flashcards: {}",
                        chunk_index + 1,
                        total,
                        deck.len(),
                        e
                    );
                    return Err(GenerationError::PartialDeck {
                        deck,
                        source: Box::new(e),
                    });
                }
            };
            debug!(
                "Chunk {}/{} produced {} flashcards",
                chunk_index + 1,
                total,
                records.len()
            );
            for (index, record) in records.into_iter().enumerate() {
                let id = format!("{deck_id}-{chunk_index}-{index}");
                deck.push(Flashcard::from_record(id, record));
            }
        }

        if deck.is_empty() {
            warn!("No flashcards generated from {} chunks", total);
            return Err(GenerationError::NoFlashcards);
        }
        info!("Built deck {} with {} flashcards", deck.id(), deck.len());
        Ok(deck)
    }
}
