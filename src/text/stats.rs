use super::word_count;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::time::Duration;

// at least one terminator, unlike the splitter pattern
static SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?؟]+[.!?؟]+").unwrap());
static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());

/// Statistics shown next to the input text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStats {
    pub words: usize,
    pub characters: usize,
    pub characters_no_whitespace: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub unique_words: usize,
    /// whole seconds at [`TextStats::READING_WPM`]
    pub reading_seconds: u64,
    /// whole seconds at [`TextStats::SPEAKING_WPM`]
    pub speaking_seconds: u64,
}

impl TextStats {
    // average silent reading speed for Arabic text
    pub const READING_WPM: usize = 238;
    pub const SPEAKING_WPM: usize = 150;

    // stripped before comparing words for uniqueness
    const PUNCTUATION: [char; 10] = ['.', ',', '!', '?', ';', ':', '"', '\'', '(', ')'];

    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self {
                characters: text.chars().count(),
                ..Default::default()
            };
        }

        let words = word_count(text);
        let sentences = match SENTENCE.find_iter(text).count() {
            0 => 1,
            n => n,
        };
        let paragraphs = LINE_BREAKS
            .split(trimmed)
            .filter(|p| !p.trim().is_empty())
            .count();
        let unique_words = text
            .split_whitespace()
            .map(|w| {
                w.to_lowercase()
                    .chars()
                    .filter(|c| !Self::PUNCTUATION.contains(c))
                    .collect::<String>()
            })
            .collect::<HashSet<_>>()
            .len();

        Self {
            words,
            characters: text.chars().count(),
            characters_no_whitespace: text.chars().filter(|c| !c.is_whitespace()).count(),
            sentences,
            paragraphs,
            unique_words,
            reading_seconds: Self::seconds_at(words, Self::READING_WPM),
            speaking_seconds: Self::seconds_at(words, Self::SPEAKING_WPM),
        }
    }

    pub fn reading_time(&self) -> Duration {
        Duration::from_secs(self.reading_seconds)
    }

    pub fn speaking_time(&self) -> Duration {
        Duration::from_secs(self.speaking_seconds)
    }

    // rounded to the nearest second
    fn seconds_at(words: usize, wpm: usize) -> u64 {
        (words as f64 * 60.0 / wpm as f64).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert_eq!(TextStats::from_text(""), TextStats::default());

        let stats = TextStats::from_text("  \n\n ");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.sentences, 0);
        assert_eq!(stats.paragraphs, 0);
        assert_eq!(stats.characters, 5);
        assert_eq!(stats.reading_time(), Duration::ZERO);
    }

    #[test]
    fn test_basic_counts() {
        let text = "Hello world. How are you?\n\nFine, thanks!\nBye";
        let stats = TextStats::from_text(text);
        assert_eq!(stats.words, 8);
        assert_eq!(stats.characters, text.chars().count());
        assert_eq!(stats.characters_no_whitespace, 36);
        // "Bye" has no terminator and is not counted
        assert_eq!(stats.sentences, 3);
        assert_eq!(stats.paragraphs, 3);
        assert_eq!(stats.unique_words, 8);
    }

    #[test]
    fn test_sentence_fallback() {
        let stats = TextStats::from_text("no terminator here");
        assert_eq!(stats.sentences, 1);
    }

    #[test]
    fn test_arabic_text() {
        let text = "كيف حالك؟ أنا بخير.";
        let stats = TextStats::from_text(text);
        assert_eq!(stats.words, 4);
        assert_eq!(stats.sentences, 2);
        assert_eq!(stats.characters, 19);
        assert_eq!(stats.paragraphs, 1);
    }

    #[test]
    fn test_unique_words_normalized() {
        let stats = TextStats::from_text("The cat, the CAT. (cat) \"the\"");
        assert_eq!(stats.words, 6);
        assert_eq!(stats.unique_words, 2);
    }

    #[test]
    fn test_reading_and_speaking_time() {
        let text = vec!["word"; 476].join(" ");
        let stats = TextStats::from_text(&text);
        assert_eq!(stats.reading_seconds, 120);
        // 476 / 150 min = 190.4s
        assert_eq!(stats.speaking_seconds, 190);
        assert_eq!(stats.speaking_time(), Duration::from_secs(190));

        let stats = TextStats::from_text("one two");
        // 2 / 238 min = 0.504s
        assert_eq!(stats.reading_seconds, 1);
    }
}
