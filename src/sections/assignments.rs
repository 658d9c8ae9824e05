//! Assignment loader
//!
//! Assignments differ from the other module-reachable categories: a locked
//! module does not hide them. The assignment document is always emitted;
//! when the module is locked its description is replaced by a lock notice
//! while name, due date and points stay visible.

use crate::document::{DocKind, DocMetadata, Document};
use crate::gateway::{Assignment, ModuleItem};
use crate::sections::{ModuleContext, ModuleDelegate, SectionContext, SectionLoader};
use crate::state::ItemKey;
use async_trait::async_trait;
use std::sync::Arc;

pub struct AssignmentLoader {
    ctx: Arc<SectionContext>,
}

impl AssignmentLoader {
    pub fn new(ctx: Arc<SectionContext>) -> Self {
        Self { ctx }
    }

    /// Formats one assignment into its document
    ///
    /// `lock_notice` replaces the real description when the containing
    /// module is locked; embeds are only expanded for real descriptions.
    async fn load_assignment(
        &self,
        assignment: &Assignment,
        lock_notice: Option<&str>,
    ) -> Vec<Document> {
        self.ctx
            .run
            .debug(format!("Loading assignment: {}", assignment.name));

        let (description, embeds) = match lock_notice {
            Some(notice) => (notice.to_string(), Vec::new()),
            None => match assignment.description.as_deref().filter(|d| !d.is_empty()) {
                Some(html) => self.ctx.parse_html(html).await,
                None => (String::new(), Vec::new()),
            },
        };

        let content = format!(
            "Name: {}\nDue Date: {}\nPoints Possible: {}\nDescription: {}\n",
            assignment.name,
            assignment.due_at.as_deref().unwrap_or("not set"),
            assignment
                .points_possible
                .map(|p| p.to_string())
                .unwrap_or_else(|| "not set".to_string()),
            description,
        );

        let metadata = DocMetadata::new(
            DocKind::Assignment,
            &assignment.name,
            &assignment.html_url,
        )
        .with_id(assignment.id);

        self.ctx.emit(&content, metadata, &embeds).await
    }
}

#[async_trait]
impl SectionLoader for AssignmentLoader {
    async fn load_section(&self) -> Vec<Document> {
        self.ctx.run.info("Loading assignments...");

        let assignments = match self.ctx.gateway.list_assignments().await {
            Ok(assignments) => assignments,
            Err(e) => {
                self.ctx
                    .run
                    .warn(format!("Error listing assignments: {}", e));
                return Vec::new();
            }
        };

        let mut documents = Vec::new();
        for assignment in &assignments {
            if !self
                .ctx
                .run
                .test_and_mark(ItemKey::Assignment(assignment.id))
            {
                continue;
            }
            documents.extend(self.load_assignment(assignment, None).await);
        }
        documents
    }
}

#[async_trait]
impl ModuleDelegate for AssignmentLoader {
    async fn load_from_module(&self, item: &ModuleItem, module: &ModuleContext) -> Vec<Document> {
        let Some(content_id) = item.content_id else {
            self.ctx.run.debug(format!(
                "Module item {} has no assignment reference",
                item.title
            ));
            return Vec::new();
        };

        if !self.ctx.run.test_and_mark(ItemKey::Assignment(content_id)) {
            return Vec::new();
        }

        self.ctx
            .run
            .debug(format!("Loading assignment {} from module", content_id));

        let assignment = match self.ctx.gateway.get_assignment(content_id).await {
            Ok(assignment) => assignment,
            Err(e) => {
                self.ctx
                    .run
                    .warn(format!("Error loading assignment {}: {}", content_id, e));
                return Vec::new();
            }
        };

        let notice = module.lock_notice();
        self.load_assignment(&assignment, notice.as_deref()).await
    }
}
