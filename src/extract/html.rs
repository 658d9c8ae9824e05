//! HTML body extraction
//!
//! Converts a rich-text body into plain text and collects the `src` of
//! every iframe for downstream embed resolution. Text extraction
//! concatenates all text nodes and trims the result; no markup-aware
//! reflowing is attempted.

use scraper::{Html, Selector};

/// Result of extracting one HTML body
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedHtml {
    /// Plain text with leading/trailing whitespace removed
    pub text: String,

    /// Raw iframe `src` values in document order, duplicates preserved
    pub iframe_srcs: Vec<String>,
}

/// Extracts plain text and iframe sources from an HTML fragment
pub fn extract_html(html: &str) -> ExtractedHtml {
    let document = Html::parse_document(html);

    let text = document
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    let mut iframe_srcs = Vec::new();
    if let Ok(selector) = Selector::parse("iframe[src]") {
        for element in document.select(&selector) {
            if let Some(src) = element.value().attr("src") {
                iframe_srcs.push(src.to_string());
            }
        }
    }

    ExtractedHtml { text, iframe_srcs }
}
