//! Page loader

use crate::document::{DocKind, DocMetadata, Document};
use crate::gateway::{CoursePage, GatewayError, ModuleItem};
use crate::sections::{ModuleContext, ModuleDelegate, SectionContext, SectionLoader};
use crate::state::ItemKey;
use async_trait::async_trait;
use std::sync::Arc;

pub struct PageLoader {
    ctx: Arc<SectionContext>,
}

impl PageLoader {
    pub fn new(ctx: Arc<SectionContext>) -> Self {
        Self { ctx }
    }

    /// Harvests one page, whichever path discovered it
    ///
    /// Skipped when the page is locked for the harvesting user, has no
    /// body, or was already claimed by another path (silently).
    async fn load_page(&self, page: &CoursePage) -> Vec<Document> {
        if page.locked_for_user {
            self.ctx
                .run
                .debug(format!("Page ({}) locked - cannot index", page.title));
            return Vec::new();
        }

        let Some(body) = page.body.as_deref().filter(|b| !b.is_empty()) else {
            return Vec::new();
        };

        if !self.ctx.run.test_and_mark(ItemKey::Page(page.page_id)) {
            return Vec::new();
        }

        self.ctx
            .run
            .debug(format!("Loading page: {}", page.title));

        let (text, embeds) = self.ctx.parse_html(body).await;
        let source = self.ctx.gateway.course_url(&format!("pages/{}", page.url));
        let metadata =
            DocMetadata::new(DocKind::Page, &page.title, source).with_id(page.page_id);

        self.ctx.emit(&text, metadata, &embeds).await
    }
}

#[async_trait]
impl SectionLoader for PageLoader {
    async fn load_section(&self) -> Vec<Document> {
        self.ctx.run.info("Loading pages...");

        let pages = match self.ctx.gateway.list_pages().await {
            Ok(pages) => pages,
            Err(e) => {
                self.ctx.run.warn(format!("Error listing pages: {}", e));
                return Vec::new();
            }
        };

        let mut documents = Vec::new();
        for page in &pages {
            documents.extend(self.load_page(page).await);
        }
        documents
    }
}

#[async_trait]
impl ModuleDelegate for PageLoader {
    async fn load_from_module(&self, item: &ModuleItem, _module: &ModuleContext) -> Vec<Document> {
        let Some(slug) = item.page_url.as_deref() else {
            self.ctx
                .run
                .debug(format!("Module item {} has no page reference", item.title));
            return Vec::new();
        };

        self.ctx
            .run
            .debug(format!("Loading page {} from module", slug));

        match self.ctx.gateway.get_page(slug).await {
            Ok(page) => self.load_page(&page).await,
            Err(GatewayError::NotFound { .. }) => {
                self.ctx
                    .run
                    .debug(format!("Page {} no longer accessible", slug));
                Vec::new()
            }
            Err(e) => {
                self.ctx
                    .run
                    .warn(format!("Error loading page {}: {}", slug, e));
                Vec::new()
            }
        }
    }
}
