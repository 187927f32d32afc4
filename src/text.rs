pub mod chunking;
pub mod stats;

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

// two or more consecutive newlines separate paragraphs
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

static DEFAULT_SENTENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(SentenceSplitter::DEFAULT_PATTERN).unwrap());

/// Count of maximal whitespace-delimited non-empty tokens.
///
/// Every size decision in the chunker goes through this function so that
/// counts stay consistent between call sites.
#[inline]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split text on runs of 2+ newlines, dropping empty or whitespace-only paragraphs.
/// Paragraphs are returned untrimmed.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .collect()
}

/// Regex based sentence splitter used for paragraphs that are too large to keep whole.
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    pattern: Regex,
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_SENTENCE_PATTERN.clone(),
        }
    }
}

impl SentenceSplitter {
    /// Latin terminators plus the Arabic question mark.
    pub const STOP_CHARS: [char; 4] = ['.', '!', '?', '؟'];

    // run of non-terminators, optional terminators, trailing whitespace.
    // abbreviations and decimals ("3.14") are split like any other terminator;
    // split_word_spans rejoins pieces that cut a token.
    pub const DEFAULT_PATTERN: &'static str = r"[^.!?؟]+[.!?؟]*\s*";

    pub fn new(pattern: Option<&str>) -> Result<Self, regex::Error> {
        match pattern {
            Some(p) => Ok(Self {
                pattern: Regex::new(p)?,
            }),
            None => Ok(Self::default()),
        }
    }

    /// Split text into sentences.
    ///
    /// Text the pattern does not match (e.g. a run of terminators at the start
    /// of the input) is returned as its own piece, so concatenating the result
    /// always reproduces the input. Input without any match is returned whole.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let sentences = Self::split_with_div_regex(&self.pattern, text);
        if sentences.is_empty() {
            vec![text]
        } else {
            sentences
        }
    }

    /// Byte ranges of the pieces returned by [`SentenceSplitter::split`].
    pub fn split_spans(&self, text: &str) -> Vec<Range<usize>> {
        let spans = Self::div_spans(&self.pattern, text);
        if spans.is_empty() {
            vec![0..text.len()]
        } else {
            spans
        }
    }

    /// Byte ranges of sentences that start and end on a word boundary.
    ///
    /// Pieces of [`SentenceSplitter::split_spans`] that end inside a token
    /// ("3." of "3.14", "e." of "e.g.") are joined with the following piece, so
    /// word counts of the ranges add up to the word count of the text.
    pub fn split_word_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = Vec::new();
        let mut open = false;
        for span in self.split_spans(text) {
            let end = span.end;
            match spans.last_mut() {
                Some(last) if open => last.end = end,
                _ => spans.push(span),
            }
            open = end < text.len()
                && !text[..end].ends_with(char::is_whitespace)
                && !text[end..].starts_with(char::is_whitespace);
        }
        spans
    }

    /// Divide text into regex matches and the unmatched gaps between them, in order.
    ///
    /// ex. r"\d+" on "ab12cd3" -> vec!["ab", "12", "cd", "3"]
    pub fn split_with_div_regex<'a>(r: &Regex, text: &'a str) -> Vec<&'a str> {
        Self::div_spans(r, text)
            .into_iter()
            .map(|span| &text[span])
            .collect()
    }

    fn div_spans(r: &Regex, text: &str) -> Vec<Range<usize>> {
        let mut divided = vec![];
        let mut prev = 0;
        for m in r.find_iter(text) {
            let (start, end) = (m.start(), m.end());
            if start == end {
                continue;
            }
            if prev < start {
                divided.push(prev..start);
            }
            divided.push(start..end);
            prev = end;
        }
        if prev < text.len() {
            divided.push(prev..text.len());
        }
        divided
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t "), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("  one  two\n\nthree\tfour "), 4);
        assert_eq!(word_count("مرحبا بالعالم"), 2);
    }

    #[test]
    fn test_split_paragraphs() {
        let text = "first paragraph\nstill first\n\nsecond\n\n\n\n   \n\nthird";
        let paragraphs = split_paragraphs(text);
        assert_eq!(
            paragraphs,
            vec!["first paragraph\nstill first", "second", "third"]
        );
        assert!(split_paragraphs("").is_empty());
        assert!(split_paragraphs("\n\n\n").is_empty());
    }

    #[test]
    fn test_split_sentences() {
        let splitter = SentenceSplitter::default();
        let sentences = splitter.split("First one. Second one! Third? Fourth؟ tail");
        assert_eq!(
            sentences,
            vec!["First one. ", "Second one! ", "Third? ", "Fourth؟ ", "tail"]
        );
    }

    #[test]
    fn test_split_without_terminators() {
        let splitter = SentenceSplitter::default();
        let text = "no terminators in this text at all";
        assert_eq!(splitter.split(text), vec![text]);
        assert_eq!(splitter.split(""), vec![""]);
    }

    #[test]
    fn test_split_keeps_unmatched_terminators() {
        let splitter = SentenceSplitter::default();
        let text = "... leading dots. and ?! more";
        let sentences = splitter.split(text);
        assert_eq!(sentences.concat(), text);
        assert_eq!(sentences[0], "...");
        let words: usize = sentences.iter().map(|s| word_count(s)).sum();
        assert_eq!(words, word_count(text));
    }

    #[test]
    fn test_split_spans_cover_text() {
        let splitter = SentenceSplitter::default();
        let text = "A. B! C";
        let spans = splitter.split_spans(text);
        assert_eq!(spans, vec![0..3, 3..6, 6..7]);
        assert_eq!(splitter.split_spans(""), vec![0..0]);
    }

    #[test]
    fn test_word_spans_keep_tokens_whole() {
        let splitter = SentenceSplitter::default();
        let text = "Pi is 3.14 today. See e.g. example.com now! End";
        let sentences: Vec<&str> = splitter
            .split_word_spans(text)
            .into_iter()
            .map(|span| &text[span])
            .collect();
        assert_eq!(
            sentences,
            vec!["Pi is 3.14 today. ", "See e.g. ", "example.com now! ", "End"]
        );
        assert_eq!(sentences.concat(), text);
        let words: usize = sentences.iter().map(|s| word_count(s)).sum();
        assert_eq!(words, word_count(text));

        assert_eq!(splitter.split_word_spans(""), vec![0..0]);
        assert_eq!(splitter.split_word_spans("v1.2.3"), vec![0..6]);
    }

    #[test]
    fn test_custom_pattern() {
        let splitter = SentenceSplitter::new(Some(r"[^;]+;?\s*")).unwrap();
        assert_eq!(splitter.split("a; b; c"), vec!["a; ", "b; ", "c"]);
        assert!(SentenceSplitter::new(Some("[unclosed")).is_err());
    }

    #[test]
    fn test_split_with_div_regex() {
        let r = Regex::new(r"<hr\s*/?>").unwrap();
        let text = "<p>a</p><hr/><p>b</p><hr><p>c</p>";
        assert_eq!(
            SentenceSplitter::split_with_div_regex(&r, text),
            vec!["<p>a</p>", "<hr/>", "<p>b</p>", "<hr>", "<p>c</p>"]
        );
        assert_eq!(
            SentenceSplitter::split_with_div_regex(&r, "plain"),
            vec!["plain"]
        );
        assert!(SentenceSplitter::split_with_div_regex(&r, "").is_empty());
    }
}
