//! Section loaders: one per content category, plus module traversal
//!
//! Two capability traits split the loader surface: every category
//! implements [`SectionLoader`] (walk the flat listing), and the categories
//! reachable through modules additionally implement [`ModuleDelegate`]
//! (load one referenced item). Both entry points share the same
//! test-and-mark path, so whichever discovers an item first wins and the
//! other emits nothing.

mod announcements;
mod assignments;
mod files;
mod modules;
mod pages;
mod syllabus;

pub use announcements::AnnouncementLoader;
pub use assignments::AssignmentLoader;
pub use files::FileLoader;
pub use modules::ModuleLoader;
pub use pages::PageLoader;
pub use syllabus::SyllabusLoader;

use crate::captions::MediaCaptionLoader;
use crate::document::{DocMetadata, Document};
use crate::extract::embed::resolve_embeds;
use crate::extract::html::extract_html;
use crate::gateway::{Course, Gateway, Module, ModuleItem};
use crate::state::RunContext;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A loader that can walk its category's full listing
#[async_trait]
pub trait SectionLoader: Send + Sync {
    /// Harvests every item in the category. Failures are logged and
    /// absorbed; the category simply contributes fewer documents.
    async fn load_section(&self) -> Vec<Document>;
}

/// A loader that can resolve a single module item reference
#[async_trait]
pub trait ModuleDelegate: Send + Sync {
    /// Harvests one item referenced from a module. Equivalent to the flat
    /// listing path with respect to deduplication.
    async fn load_from_module(&self, item: &ModuleItem, module: &ModuleContext) -> Vec<Document>;
}

/// Lock context computed once per module and applied to its items
#[derive(Debug, Clone)]
pub struct ModuleContext {
    pub name: String,
    pub locked: bool,
    pub unlock_at: Option<DateTime<Utc>>,
}

impl ModuleContext {
    /// Derives the lock state of `module` as of `now` (both UTC)
    pub fn for_module(module: &Module, now: DateTime<Utc>) -> Self {
        let locked = module.unlock_at.map(|t| now < t).unwrap_or(false);
        Self {
            name: module.name.clone(),
            locked,
            unlock_at: module.unlock_at,
        }
    }

    /// Notice text substituted for a locked assignment's description
    pub fn lock_notice(&self) -> Option<String> {
        if !self.locked {
            return None;
        }
        self.unlock_at.map(|unlock_at| {
            format!(
                "Assignment is part of module {}, which is locked until {}",
                self.name,
                unlock_at.format("%b %d, %Y at %H:%M UTC")
            )
        })
    }
}

/// Shared dependencies handed to every section loader
pub struct SectionContext {
    pub gateway: Gateway,
    pub run: Arc<RunContext>,
    pub captions: MediaCaptionLoader,
    pub course: Course,
    ui_hostname: String,
    load_captions: bool,
}

impl SectionContext {
    pub fn new(
        gateway: Gateway,
        run: Arc<RunContext>,
        captions: MediaCaptionLoader,
        course: Course,
        ui_hostname: String,
        load_captions: bool,
    ) -> Self {
        Self {
            gateway,
            run,
            captions,
            course,
            ui_hostname,
            load_captions,
        }
    }

    /// Converts an HTML body to text and resolves its embedded resources
    ///
    /// Embed resolution is skipped entirely when caption loading is off;
    /// the text conversion is unaffected.
    pub async fn parse_html(&self, html: &str) -> (String, Vec<String>) {
        let extracted = extract_html(html);
        if !self.load_captions {
            return (extracted.text, Vec::new());
        }
        let embeds = resolve_embeds(
            &self.gateway,
            &self.run,
            &self.ui_hostname,
            &extracted.iframe_srcs,
        )
        .await;
        (extracted.text, embeds)
    }

    /// Builds the documents for one extracted item: the item's own document
    /// (skipped when the content is empty) plus any caption documents its
    /// embeds expand into.
    pub async fn emit(
        &self,
        content: &str,
        metadata: DocMetadata,
        embed_urls: &[String],
    ) -> Vec<Document> {
        let mut documents = Vec::new();
        if !content.trim().is_empty() {
            documents.push(Document::new(content.trim(), metadata.clone()));
        }
        if self.load_captions && !embed_urls.is_empty() {
            documents.extend(self.captions.expand(embed_urls, &metadata).await);
        }
        documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn module(unlock_at: Option<DateTime<Utc>>) -> Module {
        serde_json::from_value(serde_json::json!({
            "id": 9,
            "name": "Week 4",
            "unlock_at": unlock_at.map(|t| t.to_rfc3339()),
        }))
        .unwrap()
    }

    #[test]
    fn test_unlocked_without_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let ctx = ModuleContext::for_module(&module(None), now);
        assert!(!ctx.locked);
        assert!(ctx.lock_notice().is_none());
    }

    #[test]
    fn test_locked_before_unlock_time() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let unlock = Utc.with_ymd_and_hms(2026, 3, 1, 13, 0, 0).unwrap();
        let ctx = ModuleContext::for_module(&module(Some(unlock)), now);
        assert!(ctx.locked);

        let notice = ctx.lock_notice().unwrap();
        assert!(notice.contains("Week 4"));
        assert!(notice.contains("locked until"));
        assert!(notice.contains("Mar 01, 2026 at 13:00 UTC"));
    }

    #[test]
    fn test_unlocked_after_unlock_time() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let unlock = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let ctx = ModuleContext::for_module(&module(Some(unlock)), now);
        assert!(!ctx.locked);
        assert!(ctx.lock_notice().is_none());
    }

    #[test]
    fn test_unlock_exactly_now_is_unlocked() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let ctx = ModuleContext::for_module(&module(Some(now)), now);
        assert!(!ctx.locked);
    }
}
