//! Merging of per-chunk HTML fragments into one document
//!
//! Each chunk of a long text is formatted on its own, so the generator returns
//! one complete HTML document per chunk. The merger keeps the `<head>` of the
//! first fragment (it carries the shared styles) and concatenates every
//! fragment's `<body>` content with a visible separator.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static RE_HEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<head>(.*?)</head>").unwrap());
static RE_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<body[^>]*>(.*?)</body>").unwrap());

/// Head used when the first fragment has none
pub const DEFAULT_HEAD: &str = r#"<meta charset="UTF-8"><title>Merged Document</title>"#;
/// Dashed rule placed between fragment bodies
pub const DEFAULT_SEPARATOR: &str =
    "\n<hr style=\"border-top: 1px dashed #ccc; margin: 2rem 0;\" />\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    pub separator: String,
    pub default_head: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            default_head: DEFAULT_HEAD.to_string(),
        }
    }
}

/// Content between the first `<head>` and the following `</head>`
pub fn extract_head(fragment: &str) -> Option<&str> {
    RE_HEAD
        .captures(fragment)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Content between the first `<body ...>` and the following `</body>`
pub fn extract_body(fragment: &str) -> Option<&str> {
    RE_BODY
        .captures(fragment)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Clone, Default)]
pub struct HtmlMerger {
    config: MergeConfig,
}

impl HtmlMerger {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge fragments into a single document.
    ///
    /// Never fails: a first fragment without `<head>` gets the default head and
    /// a fragment without `<body>` contributes its raw text. No input gives an
    /// empty string.
    pub fn merge<S: AsRef<str>>(&self, fragments: &[S]) -> String {
        let Some(first) = fragments.first() else {
            return String::new();
        };

        let head = extract_head(first.as_ref()).unwrap_or_else(|| {
            warn!("First fragment has no <head>, using default head");
            self.config.default_head.as_str()
        });

        let bodies = fragments
            .iter()
            .enumerate()
            .map(|(index, fragment)| {
                let fragment = fragment.as_ref();
                extract_body(fragment).unwrap_or_else(|| {
                    warn!("Fragment {} has no <body>, using raw fragment", index);
                    fragment
                })
            })
            .join(&self.config.separator);

        debug!(
            "Merged {} fragments into {} bytes",
            fragments.len(),
            bodies.len()
        );
        format!("<!DOCTYPE html><html><head>{head}</head><body>{bodies}</body></html>")
    }
}

/// Merge fragments with the default separator and head
pub fn merge_html_chunks<S: AsRef<str>>(fragments: &[S]) -> String {
    HtmlMerger::default().merge(fragments)
}
