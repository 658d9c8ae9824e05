//! File-format dispatch and extractor collaborators
//!
//! Files are dispatched on their declared content type through a closed
//! [`FileKind`] enum; unrecognized types land in `Unsupported` and are
//! recorded rather than extracted. Byte-level conversion of the opaque
//! formats (PDF, word processing, spreadsheets, presentations, RTF) is
//! delegated to collaborator traits registered in an [`ExtractorSet`] —
//! this crate owns routing, not decoding.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors produced by extractor collaborators
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The document is encrypted and cannot be read
    #[error("document is encrypted")]
    Encrypted,

    #[error("extraction failed: {0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recognized file content types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileKind {
    PlainText,
    Rtf,
    Html,
    Pdf,
    Docx,
    Excel,
    Pptx,
    Markdown,
    Csv,
    /// Anything the allow-list does not cover; carries the reported type
    Unsupported(String),
}

impl FileKind {
    /// Maps a declared MIME content type onto the dispatch enum
    pub fn from_content_type(content_type: &str) -> Self {
        match content_type {
            "text/plain" => Self::PlainText,
            "text/rtf" => Self::Rtf,
            "text/html" => Self::Html,
            "application/pdf" => Self::Pdf,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Self::Docx
            }
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Self::Excel,
            "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
                Self::Pptx
            }
            "text/markdown" | "text/md" => Self::Markdown,
            "text/csv" => Self::Csv,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// Returns true for kinds that go through the temp-file conversion path
    pub fn is_converted(&self) -> bool {
        matches!(
            self,
            Self::Docx | Self::Excel | Self::Pptx | Self::Markdown | Self::Csv
        )
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlainText => write!(f, "text"),
            Self::Rtf => write!(f, "rtf"),
            Self::Html => write!(f, "html"),
            Self::Pdf => write!(f, "pdf"),
            Self::Docx => write!(f, "docx"),
            Self::Excel => write!(f, "excel"),
            Self::Pptx => write!(f, "pptx"),
            Self::Markdown => write!(f, "markdown"),
            Self::Csv => write!(f, "csv"),
            Self::Unsupported(s) => write!(f, "{}", s),
        }
    }
}

/// Collaborator that extracts PDF text page by page
pub trait PdfExtractor: Send + Sync {
    /// Returns one string per page, in page order.
    ///
    /// Implementations signal an encrypted document with
    /// [`ExtractError::Encrypted`].
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError>;
}

/// Collaborator that converts RTF markup to plain text
pub trait RtfExtractor: Send + Sync {
    fn to_text(&self, rtf: &str) -> Result<String, ExtractError>;
}

/// Collaborator that converts an on-disk file to text segments
///
/// Used for the byte-oriented formats (word processing, spreadsheets,
/// presentations, markdown, CSV): the caller writes the bytes to a scoped
/// temporary location and hands over the path.
pub trait FileConverter: Send + Sync {
    fn convert(&self, path: &Path) -> Result<Vec<String>, ExtractError>;
}

/// Registry of extractor collaborators, keyed by file kind
///
/// An empty set is valid: files whose kind has no registered extractor are
/// recorded as invalid instead of extracted.
#[derive(Clone, Default)]
pub struct ExtractorSet {
    pdf: Option<Arc<dyn PdfExtractor>>,
    rtf: Option<Arc<dyn RtfExtractor>>,
    converters: HashMap<FileKind, Arc<dyn FileConverter>>,
}

impl ExtractorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pdf(mut self, extractor: Arc<dyn PdfExtractor>) -> Self {
        self.pdf = Some(extractor);
        self
    }

    pub fn with_rtf(mut self, extractor: Arc<dyn RtfExtractor>) -> Self {
        self.rtf = Some(extractor);
        self
    }

    pub fn with_converter(mut self, kind: FileKind, converter: Arc<dyn FileConverter>) -> Self {
        self.converters.insert(kind, converter);
        self
    }

    pub fn pdf(&self) -> Option<&dyn PdfExtractor> {
        self.pdf.as_deref()
    }

    pub fn rtf(&self) -> Option<&dyn RtfExtractor> {
        self.rtf.as_deref()
    }

    pub fn converter(&self, kind: &FileKind) -> Option<&dyn FileConverter> {
        self.converters.get(kind).map(|c| c.as_ref())
    }
}

impl fmt::Debug for ExtractorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorSet")
            .field("pdf", &self.pdf.is_some())
            .field("rtf", &self.rtf.is_some())
            .field("converters", &self.converters.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(FileKind::from_content_type("text/plain"), FileKind::PlainText);
        assert_eq!(
            FileKind::from_content_type("application/pdf"),
            FileKind::Pdf
        );
        assert_eq!(
            FileKind::from_content_type("application/vnd.ms-excel"),
            FileKind::Excel
        );
        assert_eq!(
            FileKind::from_content_type(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
            FileKind::Excel
        );
        assert_eq!(FileKind::from_content_type("text/markdown"), FileKind::Markdown);
        assert_eq!(FileKind::from_content_type("text/csv"), FileKind::Csv);
    }

    #[test]
    fn test_unknown_content_type() {
        let kind = FileKind::from_content_type("application/zip");
        assert_eq!(kind, FileKind::Unsupported("application/zip".to_string()));
        assert!(!kind.is_converted());
    }

    #[test]
    fn test_converted_kinds() {
        assert!(FileKind::Docx.is_converted());
        assert!(FileKind::Csv.is_converted());
        assert!(!FileKind::Pdf.is_converted());
        assert!(!FileKind::Html.is_converted());
    }

    #[test]
    fn test_empty_set_has_no_extractors() {
        let set = ExtractorSet::new();
        assert!(set.pdf().is_none());
        assert!(set.rtf().is_none());
        assert!(set.converter(&FileKind::Docx).is_none());
    }

    struct StubConverter;
    impl FileConverter for StubConverter {
        fn convert(&self, _path: &Path) -> Result<Vec<String>, ExtractError> {
            Ok(vec!["converted".to_string()])
        }
    }

    #[test]
    fn test_registered_converter_found() {
        let set = ExtractorSet::new().with_converter(FileKind::Docx, Arc::new(StubConverter));
        assert!(set.converter(&FileKind::Docx).is_some());
        assert!(set.converter(&FileKind::Pptx).is_none());
    }
}
