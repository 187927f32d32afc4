pub mod merge;

pub use merge::{HtmlMerger, MergeConfig, merge_html_chunks};

use itertools::Itertools;
use scraper::{ElementRef, Html};

// elements whose text is never part of the readable content
const HIDDEN_ELEMENTS: [&str; 6] = ["head", "title", "style", "script", "noscript", "template"];

// elements that start and end a paragraph of extracted text
const BLOCK_ELEMENTS: [&str; 30] = [
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "dl", "dt", "dd", "table",
    "tr", "td", "th", "section", "article", "header", "footer", "main", "aside", "nav",
    "blockquote", "pre", "figure", "hr", "br",
];

/// Remove a markdown code fence the generator wraps its output in.
///
/// A leading "```{lang}" (and the whitespace after it) and a trailing "```"
/// are dropped, then the result is trimmed. Text without a fence is only trimmed.
///
/// ex. strip_code_fences("```html\n<p>hi</p>\n```", "html") -> "<p>hi</p>"
pub fn strip_code_fences(text: &str, lang: &str) -> String {
    let body = text
        .strip_prefix("```")
        .and_then(|rest| rest.strip_prefix(lang))
        .map(str::trim_start)
        .unwrap_or(text);
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim().to_string()
}

/// Extract readable plain text from an HTML document.
///
/// The document is parsed into a DOM, so entities are decoded and attribute
/// values never leak into the text. `<head>`, `<style>` and `<script>` are
/// dropped with their content. Block elements become paragraph breaks so that
/// the result can be chunked by paragraph; whitespace inside a paragraph is
/// collapsed to single spaces.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut extractor = TextExtractor::default();
    extractor.visit(document.root_element());
    extractor.finish()
}

#[derive(Default)]
struct TextExtractor {
    paragraphs: Vec<String>,
    current: String,
}

impl TextExtractor {
    fn visit(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();
        if HIDDEN_ELEMENTS.contains(&name) {
            return;
        }
        let is_block = BLOCK_ELEMENTS.contains(&name);
        if is_block {
            self.break_paragraph();
        }
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                self.current.push_str(text);
            } else if let Some(child_element) = ElementRef::wrap(child) {
                self.visit(child_element);
            }
        }
        if is_block {
            self.break_paragraph();
        }
    }

    fn break_paragraph(&mut self) {
        let paragraph = self.current.split_whitespace().join(" ");
        self.current.clear();
        if !paragraph.is_empty() {
            self.paragraphs.push(paragraph);
        }
    }

    fn finish(mut self) -> String {
        self.break_paragraph();
        self.paragraphs.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(
            strip_code_fences("```html\n<p>hi</p>\n```", "html"),
            "<p>hi</p>"
        );
        assert_eq!(
            strip_code_fences("```json  [{\"a\": 1}]```\n", "json"),
            "[{\"a\": 1}]"
        );
        // no fence, only trimmed
        assert_eq!(strip_code_fences("  <p>hi</p>\n", "html"), "<p>hi</p>");
        // opening fence of another language is kept
        assert_eq!(strip_code_fences("```xml\n<a/>", "html"), "```xml\n<a/>");
        // trailing fence only (streamed output cut before the end)
        assert_eq!(strip_code_fences("<p>hi</p>```", "html"), "<p>hi</p>");
        assert_eq!(strip_code_fences("", "html"), "");
    }

    #[test]
    fn test_html_to_text() {
        let html = r#"<!DOCTYPE html><html><head><title>Doc</title>
<style>body { color: red; }</style></head>
<body dir="rtl"><h1>Title</h1><p>First <b>bold</b> line.</p>
<script>alert("x")</script><!-- note -->
<ul><li>one</li><li>two &amp; three</li></ul><p>a&nbsp;&lt;b&gt; &quot;q&quot;</p></body></html>"#;

        assert_eq!(
            html_to_text(html),
            "Title\n\nFirst bold line.\n\none\n\ntwo & three\n\na <b> \"q\""
        );
    }

    #[test]
    fn test_html_to_text_plain_input() {
        assert_eq!(html_to_text("just text"), "just text");
        assert_eq!(html_to_text("  "), "");
        assert_eq!(html_to_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_html_to_text_decodes_entities() {
        let html = r#"<body><p title="a > b">caf&eacute; &hellip; &#1587;&#x627;</p></body>"#;
        assert_eq!(html_to_text(html), "café … سا");

        let html = r#"<p data-note="<b>x</b>">kept <span class="a>b">inline</span>text</p>"#;
        assert_eq!(html_to_text(html), "kept inlinetext");
    }

    #[test]
    fn test_html_to_text_paragraphs_are_chunkable() {
        let html = "<p>one two</p><p>three</p><div>four</div>";
        let text = html_to_text(html);
        assert_eq!(
            crate::text::split_paragraphs(&text),
            vec!["one two", "three", "four"]
        );
    }
}
