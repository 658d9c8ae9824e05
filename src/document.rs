//! Normalized output documents
//!
//! Every harvested item, whatever its origin, is flattened into a
//! [`Document`]: plain text plus a uniform metadata record. Downstream
//! consumers index these without caring which traversal path produced them.

use serde::Serialize;
use std::fmt;

/// The content category a document was harvested from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocKind {
    Page,
    Announcement,
    Assignment,
    File,
    Syllabus,
    MediaCaption,
    ExternalUrl,
}

impl DocKind {
    /// Returns the wire/display name for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Announcement => "announcement",
            Self::Assignment => "assignment",
            Self::File => "file",
            Self::Syllabus => "syllabus",
            Self::MediaCaption => "media_caption",
            Self::ExternalUrl => "external_url",
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Uniform metadata attached to every document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocMetadata {
    pub kind: DocKind,

    /// Human-readable filename or title of the source item
    #[serde(rename = "filename")]
    pub title: String,

    /// URL of the source item
    pub source: String,

    /// Category-specific identifier (page id, assignment id, file id, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// 1-based page number for paginated formats
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,

    /// Media identifier, present on caption documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,

    /// Source URL of the item that embedded this media
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_context: Option<String>,
}

impl DocMetadata {
    pub fn new(kind: DocKind, title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            source: source.into(),
            id: None,
            page: None,
            media_id: None,
            course_context: None,
        }
    }

    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

/// A single harvested text document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocMetadata,
}

impl Document {
    /// Builds a document, stripping embedded NUL characters from the content.
    ///
    /// Binary-to-text converters occasionally leak NUL bytes, which most
    /// indexers reject.
    pub fn new(content: impl Into<String>, metadata: DocMetadata) -> Self {
        let content = content.into();
        let content = if content.contains('\0') {
            content.replace('\0', "")
        } else {
            content
        };
        Self { content, metadata }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(DocKind::Page.as_str(), "page");
        assert_eq!(DocKind::MediaCaption.as_str(), "media_caption");
        assert_eq!(DocKind::ExternalUrl.as_str(), "external_url");
    }

    #[test]
    fn test_metadata_builder() {
        let meta = DocMetadata::new(DocKind::File, "notes.pdf", "https://x/files/7")
            .with_id(7)
            .with_page(2);
        assert_eq!(meta.id.as_deref(), Some("7"));
        assert_eq!(meta.page, Some(2));
        assert_eq!(meta.title, "notes.pdf");
    }

    #[test]
    fn test_nul_bytes_stripped() {
        let doc = Document::new(
            "a\0b\0c",
            DocMetadata::new(DocKind::File, "f", "s"),
        );
        assert_eq!(doc.content, "abc");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&DocKind::MediaCaption).unwrap();
        assert_eq!(json, "\"media_caption\"");
    }
}
