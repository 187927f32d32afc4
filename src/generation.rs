//! Contracts for the generative-language service and the request types passed to it
//!
//! The service itself (prompting, network calls) lives outside this crate.
//! Implementations of [`ContentGenerator`] and [`FlashcardSource`] are driven
//! chunk by chunk by the drivers in [`pipeline`].

pub mod error;
pub mod flashcard;
pub mod pipeline;

pub use error::{GenerationError, Result};
pub use flashcard::{
    Difficulty, DifficultyFilter, Flashcard, FlashcardDeck, FlashcardRecord, StatusFilter,
    parse_flashcards,
};
pub use pipeline::{DocumentFormatter, FlashcardBuilder, Progress};

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLanguage {
    #[default]
    Ar,
    En,
}

impl OutputLanguage {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::En => "en",
        }
    }

    /// Text direction for the `dir` attribute
    pub fn dir(&self) -> &'static str {
        match self {
            Self::Ar => "rtl",
            Self::En => "ltr",
        }
    }

    /// Target language of a translation
    pub fn opposite(&self) -> Self {
        match self {
            Self::Ar => Self::En,
            Self::En => Self::Ar,
        }
    }
}

impl std::fmt::Display for OutputLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    #[default]
    Speed,
    Quality,
}

impl ProcessingMode {
    /// Thinking budget to request from the model; `None` leaves the service default
    pub fn thinking_budget(&self) -> Option<u32> {
        match self {
            Self::Speed => Some(0),
            Self::Quality => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    pub font_family: String,
    pub line_height: f32,
    pub heading_color: String,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            font_family: Self::DEFAULT_FONT.to_string(),
            line_height: 1.8,
            heading_color: "#0d6efd".to_string(),
        }
    }
}

impl StyleOptions {
    pub const DEFAULT_FONT: &'static str = "Tajawal";

    // (family, Google Fonts family with weights)
    pub const FONTS: [(&'static str, &'static str); 4] = [
        ("Tajawal", "Tajawal:wght@400;500;700"),
        ("Cairo", "Cairo:wght@400;500;700"),
        ("Noto Sans Arabic", "Noto Sans Arabic:wght@400;500;700"),
        ("Amiri", "Amiri:wght@400;700"),
    ];

    /// Google Fonts `family=` query value; unknown families fall back to the default font
    pub fn google_font_query(&self) -> String {
        let family = Self::FONTS
            .iter()
            .find(|(name, _)| *name == self.font_family)
            .or_else(|| Self::FONTS.iter().find(|(name, _)| *name == Self::DEFAULT_FONT))
            .map(|(_, weights)| *weights)
            .unwrap_or(Self::DEFAULT_FONT);
        family.split_whitespace().collect::<Vec<_>>().join("+")
    }
}

/// Parameters of one formatting request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatRequest {
    pub background_color: String,
    pub text_color: String,
    pub output_language: OutputLanguage,
    pub mode: ProcessingMode,
    pub style: StyleOptions,
}

impl Default for FormatRequest {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            text_color: "#000000".to_string(),
            output_language: OutputLanguage::default(),
            mode: ProcessingMode::default(),
            style: StyleOptions::default(),
        }
    }
}

/// Streaming text generation.
///
/// Each call yields pieces of the output in order; appending them gives the
/// full result. An `Err` item aborts the call.
pub trait ContentGenerator: Send + Sync {
    /// Format plain text as a complete HTML document
    fn format_text<'a>(
        &'a self,
        text: &'a str,
        request: &'a FormatRequest,
    ) -> BoxStream<'a, Result<String>>;

    /// Translate the visible text of an HTML document, keeping its markup
    fn translate_html<'a>(
        &'a self,
        html: &'a str,
        target: OutputLanguage,
    ) -> BoxStream<'a, Result<String>>;

    /// Rewrite chemical formulas and exponents with Unicode sub/superscripts
    fn improve_text<'a>(&'a self, text: &'a str) -> BoxStream<'a, Result<String>>;
}

/// Question/answer extraction from plain text
pub trait FlashcardSource: Send + Sync {
    fn generate_flashcards<'a>(
        &'a self,
        text: &'a str,
    ) -> BoxFuture<'a, Result<Vec<FlashcardRecord>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_language() {
        assert_eq!(OutputLanguage::default(), OutputLanguage::Ar);
        assert_eq!(OutputLanguage::Ar.dir(), "rtl");
        assert_eq!(OutputLanguage::En.dir(), "ltr");
        assert_eq!(OutputLanguage::Ar.opposite(), OutputLanguage::En);
        assert_eq!(OutputLanguage::En.opposite().opposite(), OutputLanguage::En);
        assert_eq!(OutputLanguage::En.to_string(), "en");
        assert_eq!(
            serde_json::from_str::<OutputLanguage>("\"ar\"").unwrap(),
            OutputLanguage::Ar
        );
    }

    #[test]
    fn test_processing_mode() {
        assert_eq!(ProcessingMode::default(), ProcessingMode::Speed);
        assert_eq!(ProcessingMode::Speed.thinking_budget(), Some(0));
        assert_eq!(ProcessingMode::Quality.thinking_budget(), None);
    }

    #[test]
    fn test_format_request_defaults() {
        let request = FormatRequest::default();
        assert_eq!(request.background_color, "#ffffff");
        assert_eq!(request.text_color, "#000000");
        assert_eq!(request.output_language, OutputLanguage::Ar);
        assert_eq!(request.style.font_family, "Tajawal");
        assert_eq!(request.style.line_height, 1.8);
        assert_eq!(request.style.heading_color, "#0d6efd");

        let request: FormatRequest =
            serde_json::from_str(r#"{"output_language": "en", "mode": "quality"}"#).unwrap();
        assert_eq!(request.output_language, OutputLanguage::En);
        assert_eq!(request.mode, ProcessingMode::Quality);
        assert_eq!(request.background_color, "#ffffff");
    }

    #[test]
    fn test_google_font_query() {
        let style = StyleOptions {
            font_family: "Noto Sans Arabic".to_string(),
            ..Default::default()
        };
        assert_eq!(style.google_font_query(), "Noto+Sans+Arabic:wght@400;500;700");

        let style = StyleOptions {
            font_family: "Comic Sans".to_string(),
            ..Default::default()
        };
        assert_eq!(style.google_font_query(), "Tajawal:wght@400;500;700");
    }
}
