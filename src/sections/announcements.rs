//! Announcement loader
//!
//! Announcements are listed over a fixed date window: a historical floor
//! through today. They are not reachable through modules, so no dedup key
//! is involved.

use crate::document::{DocKind, DocMetadata, Document};
use crate::gateway::Announcement;
use crate::sections::{SectionContext, SectionLoader};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

pub struct AnnouncementLoader {
    ctx: Arc<SectionContext>,
}

impl AnnouncementLoader {
    pub fn new(ctx: Arc<SectionContext>) -> Self {
        Self { ctx }
    }

    fn window_start() -> NaiveDate {
        // Courses older than this floor are out of service
        NaiveDate::from_ymd_opt(2016, 1, 1).expect("fixed calendar date")
    }

    async fn load_announcement(&self, announcement: &Announcement) -> Vec<Document> {
        self.ctx
            .run
            .debug(format!("Loading announcement: {}", announcement.title));

        let body = announcement.message.as_deref().unwrap_or("");
        let (text, embeds) = self.ctx.parse_html(body).await;

        let metadata = DocMetadata::new(
            DocKind::Announcement,
            &announcement.title,
            &announcement.html_url,
        )
        .with_id(announcement.id);

        self.ctx.emit(&text, metadata, &embeds).await
    }
}

#[async_trait]
impl SectionLoader for AnnouncementLoader {
    async fn load_section(&self) -> Vec<Document> {
        self.ctx.run.info("Loading announcements...");

        let announcements = match self
            .ctx
            .gateway
            .list_announcements(Self::window_start(), Utc::now().date_naive())
            .await
        {
            Ok(announcements) => announcements,
            Err(e) => {
                self.ctx
                    .run
                    .warn(format!("Error listing announcements: {}", e));
                return Vec::new();
            }
        };

        let mut documents = Vec::new();
        for announcement in &announcements {
            documents.extend(self.load_announcement(announcement).await);
        }
        documents
    }
}
