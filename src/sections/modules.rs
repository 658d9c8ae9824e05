//! Module traversal
//!
//! Walks every module in listing order, derives the module's lock state
//! once, and resolves each item through the matching category delegate.
//! Lock handling is deliberately asymmetric: locked pages and files are
//! skipped outright, assignments are always emitted (with a lock notice
//! substituted for the description), and external URLs are additionally
//! gated by a configuration flag.

use crate::document::Document;
use crate::extract::webpage::WebPageLoader;
use crate::gateway::{ModuleItem, ModuleItemKind};
use crate::sections::{ModuleContext, ModuleDelegate, SectionContext, SectionLoader};
use crate::state::ItemKey;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

pub struct ModuleLoader {
    ctx: Arc<SectionContext>,
    pages: Arc<dyn ModuleDelegate>,
    assignments: Arc<dyn ModuleDelegate>,
    files: Arc<dyn ModuleDelegate>,
    web: WebPageLoader,
    index_external_urls: bool,
}

impl ModuleLoader {
    pub fn new(
        ctx: Arc<SectionContext>,
        pages: Arc<dyn ModuleDelegate>,
        assignments: Arc<dyn ModuleDelegate>,
        files: Arc<dyn ModuleDelegate>,
        index_external_urls: bool,
    ) -> Self {
        Self {
            ctx,
            pages,
            assignments,
            files,
            web: WebPageLoader::new(),
            index_external_urls,
        }
    }

    async fn load_item(&self, item: &ModuleItem, module: &ModuleContext) -> Vec<Document> {
        match &item.kind {
            ModuleItemKind::Page => {
                if module.locked {
                    self.ctx
                        .run
                        .debug(format!("Page ({}) locked - cannot index", item.title));
                    return Vec::new();
                }
                self.pages.load_from_module(item, module).await
            }
            ModuleItemKind::File => {
                if module.locked {
                    self.ctx
                        .run
                        .debug(format!("File ({}) locked - cannot index", item.title));
                    return Vec::new();
                }
                self.files.load_from_module(item, module).await
            }
            // Lock state is carried through: the assignment still produces
            // a document, with a notice body when locked
            ModuleItemKind::Assignment => self.assignments.load_from_module(item, module).await,
            ModuleItemKind::ExternalUrl => self.load_external_url(item, module).await,
            ModuleItemKind::Other(kind) => {
                self.ctx.run.debug(format!(
                    "Module item {} is an unsupported type ({})",
                    item.title, kind
                ));
                Vec::new()
            }
        }
    }

    async fn load_external_url(&self, item: &ModuleItem, module: &ModuleContext) -> Vec<Document> {
        if !self.index_external_urls {
            return Vec::new();
        }
        if module.locked {
            self.ctx
                .run
                .debug(format!("External URL ({}) locked - cannot index", item.title));
            return Vec::new();
        }
        let Some(url) = item.external_url.as_deref() else {
            return Vec::new();
        };
        if !self
            .ctx
            .run
            .test_and_mark(ItemKey::ExternalUrl(url.to_string()))
        {
            return Vec::new();
        }

        self.ctx
            .run
            .debug(format!("Loading external url {}", url));

        match self.web.load_url(url, &item.title).await {
            Ok(documents) => documents,
            Err(message) => {
                self.ctx.run.warn(message);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl SectionLoader for ModuleLoader {
    async fn load_section(&self) -> Vec<Document> {
        self.ctx.run.info("Loading modules...");

        let modules = match self.ctx.gateway.list_modules().await {
            Ok(modules) => modules,
            Err(e) => {
                self.ctx.run.warn(format!("Error listing modules: {}", e));
                return Vec::new();
            }
        };

        let mut documents = Vec::new();
        for module in &modules {
            let module_ctx = ModuleContext::for_module(module, Utc::now());

            // A failing module costs only its own items
            let items = match self.ctx.gateway.list_module_items(module.id).await {
                Ok(items) => items,
                Err(e) => {
                    self.ctx.run.warn(format!(
                        "Error listing items for module {}: {}",
                        module.name, e
                    ));
                    continue;
                }
            };

            for item in &items {
                documents.extend(self.load_item(item, &module_ctx).await);
            }
        }
        documents
    }
}
