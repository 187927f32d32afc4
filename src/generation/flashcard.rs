use super::error::{GenerationError, Result};
use crate::html::strip_code_fences;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// display order of difficulty groups
    pub const ORDER: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// One question/answer pair as returned by the generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardRecord {
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
}

/// Parse the JSON array returned by the service.
///
/// The service sometimes wraps the array in a ```json fence; it is removed
/// first. A blank response is treated as no flashcards.
pub fn parse_flashcards(raw: &str) -> Result<Vec<FlashcardRecord>> {
    let raw = raw.trim();
    if raw.is_empty() {
        warn!("Received empty response for flashcard generation");
        return Ok(vec![]);
    }
    let json = strip_code_fences(raw, "json");
    serde_json::from_str(&json).map_err(|e| GenerationError::malformed_output(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub is_done: bool,
}

impl Flashcard {
    pub fn from_record(id: String, record: FlashcardRecord) -> Self {
        Self {
            id,
            question: record.question,
            answer: record.answer,
            difficulty: record.difficulty,
            is_done: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Done,
}

impl StatusFilter {
    pub fn matches(&self, card: &Flashcard) -> bool {
        match self {
            Self::All => true,
            Self::Active => !card.is_done,
            Self::Done => card.is_done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    pub fn matches(&self, card: &Flashcard) -> bool {
        match self {
            Self::All => true,
            Self::Only(difficulty) => card.difficulty == *difficulty,
        }
    }
}

/// Flashcards generated from one document, in generation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardDeck {
    id: String,
    cards: Vec<Flashcard>,
}

impl FlashcardDeck {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cards: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn push(&mut self, card: Flashcard) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Flashcard> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Flip the done flag of a card, returning its new state (None if no such card)
    pub fn toggle_done(&mut self, id: &str) -> Option<bool> {
        self.cards.iter_mut().find(|c| c.id == id).map(|card| {
            card.is_done = !card.is_done;
            card.is_done
        })
    }

    pub fn done_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_done).count()
    }

    pub fn filter(&self, status: StatusFilter, difficulty: DifficultyFilter) -> Vec<&Flashcard> {
        self.cards
            .iter()
            .filter(|c| status.matches(c) && difficulty.matches(c))
            .collect()
    }

    /// Cards grouped by difficulty in [`Difficulty::ORDER`]; empty groups are omitted
    pub fn grouped(&self) -> Vec<(Difficulty, Vec<&Flashcard>)> {
        Difficulty::ORDER
            .iter()
            .map(|d| {
                let cards = self.filter(StatusFilter::All, DifficultyFilter::Only(*d));
                (*d, cards)
            })
            .filter(|(_, cards)| !cards.is_empty())
            .collect()
    }
}
