//! Syllabus loader
//!
//! The syllabus is a single pseudo-item carried on the course record
//! itself; it is attempted unconditionally, before the tab-gated
//! categories.

use crate::document::{DocKind, DocMetadata, Document};
use crate::extract::html::extract_html;
use crate::sections::{SectionContext, SectionLoader};
use async_trait::async_trait;
use std::sync::Arc;

pub struct SyllabusLoader {
    ctx: Arc<SectionContext>,
}

impl SyllabusLoader {
    pub fn new(ctx: Arc<SectionContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl SectionLoader for SyllabusLoader {
    async fn load_section(&self) -> Vec<Document> {
        self.ctx.run.info("Loading syllabus...");

        let Some(body) = self.ctx.course.syllabus_body.as_deref() else {
            return Vec::new();
        };

        let text = extract_html(body).text;
        if text.is_empty() {
            return Vec::new();
        }

        let source = self.ctx.gateway.course_url("assignments/syllabus");
        let metadata = DocMetadata::new(DocKind::Syllabus, "Course Syllabus", source);
        vec![Document::new(text, metadata)]
    }
}
