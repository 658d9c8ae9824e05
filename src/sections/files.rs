//! File loader
//!
//! Files are dispatched on declared content type: text and HTML are read
//! directly, PDFs fan out into one document per page, and the byte-oriented
//! office formats go through a scoped temporary file and a registered
//! converter. A file whose type has no registered extractor is recorded as
//! invalid instead of extracted, and a file that vanished between listing
//! and fetch (hidden module) degrades the same way.

use crate::document::{DocKind, DocMetadata, Document};
use crate::extract::formats::{ExtractError, ExtractorSet, FileKind};
use crate::gateway::{CourseFile, GatewayError, ModuleItem};
use crate::sections::{ModuleContext, ModuleDelegate, SectionContext, SectionLoader};
use crate::state::ItemKey;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
enum FileError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct FileLoader {
    ctx: Arc<SectionContext>,
    extractors: ExtractorSet,
}

impl FileLoader {
    pub fn new(ctx: Arc<SectionContext>, extractors: ExtractorSet) -> Self {
        Self { ctx, extractors }
    }

    /// Harvests one file, whichever path discovered it
    async fn load_file(&self, file: &CourseFile) -> Vec<Document> {
        if !self.ctx.run.test_and_mark(ItemKey::File(file.id)) {
            return Vec::new();
        }

        let kind = FileKind::from_content_type(&file.content_type);
        if let FileKind::Unsupported(content_type) = &kind {
            self.ctx.run.record_invalid_file(&file.filename, content_type);
            self.ctx.run.debug(format!(
                "File {} has unsupported type {}",
                file.filename, content_type
            ));
            return Vec::new();
        }

        self.ctx
            .run
            .debug(format!("Loading file: {}", file.filename));

        match self.extract_file(file, &kind).await {
            Ok(documents) => documents,
            Err(FileError::Gateway(GatewayError::NotFound { .. })) => {
                self.ctx.run.debug(format!(
                    "File {} does not exist - likely in a hidden module",
                    file.filename
                ));
                self.ctx
                    .run
                    .record_invalid_file(&file.filename, &file.content_type);
                Vec::new()
            }
            Err(FileError::Extract(ExtractError::Encrypted)) => {
                self.ctx
                    .run
                    .warn(format!("File {} is encrypted", file.filename));
                Vec::new()
            }
            Err(e) => {
                self.ctx
                    .run
                    .warn(format!("Error loading file {}: {}", file.filename, e));
                Vec::new()
            }
        }
    }

    async fn extract_file(
        &self,
        file: &CourseFile,
        kind: &FileKind,
    ) -> Result<Vec<Document>, FileError> {
        match kind {
            FileKind::PlainText => self.load_text(file).await,
            FileKind::Rtf => self.load_rtf(file).await,
            FileKind::Html => self.load_html(file).await,
            FileKind::Pdf => self.load_pdf(file).await,
            _ => self.load_converted(file, kind).await,
        }
    }

    fn metadata(&self, file: &CourseFile, source: &str) -> DocMetadata {
        DocMetadata::new(DocKind::File, &file.filename, source).with_id(file.id)
    }

    /// Source URL used for documents produced from converted bytes
    fn converted_source(&self, file: &CourseFile) -> String {
        self.ctx.gateway.course_url(&format!("files/{}", file.id))
    }

    async fn load_text(&self, file: &CourseFile) -> Result<Vec<Document>, FileError> {
        let contents = self.ctx.gateway.fetch_text(&file.url).await?;
        let metadata = self.metadata(file, &file.url);
        Ok(self.ctx.emit(&contents, metadata, &[]).await)
    }

    async fn load_rtf(&self, file: &CourseFile) -> Result<Vec<Document>, FileError> {
        let Some(rtf) = self.extractors.rtf() else {
            self.record_missing_extractor(file);
            return Ok(Vec::new());
        };
        let contents = self.ctx.gateway.fetch_text(&file.url).await?;
        let text = rtf.to_text(&contents)?;
        let metadata = self.metadata(file, &file.url);
        Ok(self.ctx.emit(&text, metadata, &[]).await)
    }

    async fn load_html(&self, file: &CourseFile) -> Result<Vec<Document>, FileError> {
        let contents = self.ctx.gateway.fetch_text(&file.url).await?;
        let (text, embeds) = self.ctx.parse_html(&contents).await;
        let metadata = self.metadata(file, &file.url);
        Ok(self.ctx.emit(&text, metadata, &embeds).await)
    }

    /// One document per PDF page, with 1-based page metadata
    async fn load_pdf(&self, file: &CourseFile) -> Result<Vec<Document>, FileError> {
        let Some(pdf) = self.extractors.pdf() else {
            self.record_missing_extractor(file);
            return Ok(Vec::new());
        };

        let bytes = self.ctx.gateway.fetch_bytes(&file.url).await?;
        let pages = pdf.extract_pages(&bytes)?;
        let source = self.converted_source(file);

        let mut documents = Vec::new();
        for (index, text) in pages.iter().enumerate() {
            if text.trim().is_empty() {
                continue;
            }
            let metadata = self.metadata(file, &source).with_page(index + 1);
            documents.push(Document::new(text.trim(), metadata));
        }
        Ok(documents)
    }

    /// Byte-oriented formats: write to a scoped temp location, convert,
    /// stamp filename/source onto every produced document
    async fn load_converted(
        &self,
        file: &CourseFile,
        kind: &FileKind,
    ) -> Result<Vec<Document>, FileError> {
        let Some(converter) = self.extractors.converter(kind) else {
            self.record_missing_extractor(file);
            return Ok(Vec::new());
        };

        let bytes = self.ctx.gateway.fetch_bytes(&file.url).await?;

        // The directory and its contents are removed when `dir` drops,
        // on success and on error alike.
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(&file.filename);
        std::fs::write(&path, &bytes)?;

        let segments = converter.convert(&path)?;
        let source = self.converted_source(file);

        let mut documents = Vec::new();
        for segment in segments {
            if segment.trim().is_empty() {
                continue;
            }
            documents.push(Document::new(segment, self.metadata(file, &source)));
        }
        Ok(documents)
    }

    fn record_missing_extractor(&self, file: &CourseFile) {
        self.ctx
            .run
            .record_invalid_file(&file.filename, &file.content_type);
        self.ctx.run.debug(format!(
            "No extractor registered for {} ({})",
            file.filename, file.content_type
        ));
    }
}

#[async_trait]
impl SectionLoader for FileLoader {
    async fn load_section(&self) -> Vec<Document> {
        self.ctx.run.info("Loading files...");

        let files = match self.ctx.gateway.list_files().await {
            Ok(files) => files,
            Err(e) => {
                self.ctx.run.warn(format!("Error listing files: {}", e));
                return Vec::new();
            }
        };

        let mut documents = Vec::new();
        for file in &files {
            documents.extend(self.load_file(file).await);
        }
        documents
    }
}

#[async_trait]
impl ModuleDelegate for FileLoader {
    async fn load_from_module(&self, item: &ModuleItem, _module: &ModuleContext) -> Vec<Document> {
        let Some(content_id) = item.content_id else {
            self.ctx
                .run
                .debug(format!("Module item {} has no file reference", item.title));
            return Vec::new();
        };

        // Already claimed via the flat listing; skip the fetch entirely
        if self.ctx.run.is_marked(&ItemKey::File(content_id)) {
            return Vec::new();
        }

        self.ctx
            .run
            .debug(format!("Loading file {} from module", content_id));

        match self.ctx.gateway.get_file(content_id).await {
            Ok(file) => self.load_file(&file).await,
            Err(GatewayError::NotFound { .. }) => {
                self.ctx.run.debug(format!(
                    "File {} does not exist - likely in a hidden module",
                    item.title
                ));
                // The listing row is unavailable on this path
                self.ctx.run.record_invalid_file(&item.title, "unknown");
                Vec::new()
            }
            Err(e) => {
                self.ctx
                    .run
                    .warn(format!("Error loading file {}: {}", content_id, e));
                Vec::new()
            }
        }
    }
}
