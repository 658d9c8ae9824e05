//! Embedded-media caption expansion
//!
//! Resolved embed URLs that point at the caption service carry a media id
//! in their path. Each id is claimed in the dedup index and its caption
//! text fetched through the [`CaptionFetcher`] collaborator. The first
//! authorization failure from the caption service disables the whole
//! subsystem for the remainder of the run; other failures cost only the
//! one media id.

use crate::document::{DocKind, DocMetadata, Document};
use crate::state::{ItemKey, RunContext};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use url::Url;

/// Path segment preceding the media id in caption-service embed URLs
const ENTRY_ID_SEGMENT: &str = "entryid";

/// Errors from the caption-service collaborator
#[derive(Debug, Error)]
pub enum CaptionError {
    /// The service rejected our credentials (HTTP 401)
    #[error("caption service request unauthorized")]
    Unauthorized,

    #[error("caption fetch failed: {0}")]
    Fetch(String),
}

/// One caption track fetched for a media id
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub media_id: String,
    pub title: String,
    pub source: String,
    pub text: String,
}

/// Collaborator client for the caption service
#[async_trait]
pub trait CaptionFetcher: Send + Sync {
    async fn fetch_captions(&self, media_id: &str) -> Result<Vec<Caption>, CaptionError>;
}

/// Expands resolved embed URLs into caption documents
pub struct MediaCaptionLoader {
    fetcher: Option<Arc<dyn CaptionFetcher>>,
    run: Arc<RunContext>,
    caption_hostname: String,
    /// Sticky: flipped false on the first 401 and never back
    authorized: Mutex<bool>,
}

impl MediaCaptionLoader {
    pub fn new(
        fetcher: Option<Arc<dyn CaptionFetcher>>,
        run: Arc<RunContext>,
        caption_hostname: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            run,
            caption_hostname: caption_hostname.into(),
            authorized: Mutex::new(true),
        }
    }

    /// Extracts the media id from an embed URL on the caption host
    pub fn media_id_from_url(&self, url: &str) -> Option<String> {
        if self.caption_hostname.is_empty() {
            return None;
        }

        let parsed = Url::parse(url).ok()?;
        if parsed.host_str()?.to_ascii_lowercase() != self.caption_hostname.to_ascii_lowercase() {
            return None;
        }

        let mut segments = parsed.path_segments()?;
        segments
            .find(|segment| *segment == ENTRY_ID_SEGMENT)
            .and_then(|_| segments.next())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    /// Fetches caption documents for every new media id among `embed_urls`
    ///
    /// Each document is tagged with the embedding item's title and source
    /// so consumers can trace a caption back to the page or file that
    /// referenced it.
    pub async fn expand(&self, embed_urls: &[String], parent: &DocMetadata) -> Vec<Document> {
        let Some(fetcher) = self.fetcher.as_ref() else {
            return Vec::new();
        };

        let mut documents = Vec::new();

        for url in embed_urls {
            if !*self.authorized.lock().unwrap() {
                self.run
                    .debug("Caption service unauthorized; skipping remaining embeds");
                return documents;
            }

            let Some(media_id) = self.media_id_from_url(url) else {
                continue;
            };

            if !self.run.test_and_mark(ItemKey::Media(media_id.clone())) {
                continue;
            }

            self.run
                .debug(format!("Fetching captions for media {}", media_id));

            match fetcher.fetch_captions(&media_id).await {
                Ok(captions) => {
                    for caption in captions {
                        let metadata = DocMetadata {
                            kind: DocKind::MediaCaption,
                            title: parent.title.clone(),
                            source: caption.source.clone(),
                            id: None,
                            page: None,
                            media_id: Some(caption.media_id.clone()),
                            course_context: Some(parent.source.clone()),
                        };
                        documents.push(Document::new(caption.text, metadata));
                    }
                }
                Err(CaptionError::Unauthorized) => {
                    *self.authorized.lock().unwrap() = false;
                    self.run.info(
                        "Caption request unauthorized; skipping caption loading for this run",
                    );
                    return documents;
                }
                Err(e) => {
                    self.run
                        .warn(format!("Error loading captions for media {}: {}", media_id, e));
                }
            }
        }

        documents
    }

    /// Returns false once an authorization failure has been observed
    pub fn is_authorized(&self) -> bool {
        *self.authorized.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(hostname: &str) -> MediaCaptionLoader {
        MediaCaptionLoader::new(None, Arc::new(RunContext::new()), hostname)
    }

    #[test]
    fn test_media_id_extracted() {
        let loader = loader("media.example.edu");
        let url = "https://media.example.edu/embed/v2/p/1/sp/100/entryid/1_ab12cd/ui";
        assert_eq!(loader.media_id_from_url(url).as_deref(), Some("1_ab12cd"));
    }

    #[test]
    fn test_media_id_wrong_host() {
        let loader = loader("media.example.edu");
        let url = "https://other.example.edu/embed/entryid/1_ab12cd";
        assert_eq!(loader.media_id_from_url(url), None);
    }

    #[test]
    fn test_media_id_missing_segment() {
        let loader = loader("media.example.edu");
        assert_eq!(
            loader.media_id_from_url("https://media.example.edu/embed/v2/p/1"),
            None
        );
    }

    #[test]
    fn test_media_id_trailing_entryid() {
        let loader = loader("media.example.edu");
        assert_eq!(
            loader.media_id_from_url("https://media.example.edu/embed/entryid"),
            None
        );
    }

    #[test]
    fn test_disabled_without_hostname() {
        let loader = loader("");
        assert_eq!(
            loader.media_id_from_url("https://media.example.edu/embed/entryid/1_x"),
            None
        );
    }

    struct CountingFetcher {
        calls: Mutex<usize>,
        fail_unauthorized: bool,
    }

    #[async_trait]
    impl CaptionFetcher for CountingFetcher {
        async fn fetch_captions(&self, media_id: &str) -> Result<Vec<Caption>, CaptionError> {
            *self.calls.lock().unwrap() += 1;
            if self.fail_unauthorized {
                return Err(CaptionError::Unauthorized);
            }
            Ok(vec![Caption {
                media_id: media_id.to_string(),
                title: "Video".to_string(),
                source: format!("https://media.example.edu/{}", media_id),
                text: "caption text".to_string(),
            }])
        }
    }

    #[tokio::test]
    async fn test_expand_tags_parent_context() {
        let fetcher = Arc::new(CountingFetcher {
            calls: Mutex::new(0),
            fail_unauthorized: false,
        });
        let run = Arc::new(RunContext::new());
        let loader =
            MediaCaptionLoader::new(Some(fetcher.clone()), run, "media.example.edu");

        let parent = DocMetadata::new(DocKind::Page, "Week 1", "https://c/pages/week-1");
        let urls = vec!["https://media.example.edu/embed/entryid/1_x/ui".to_string()];
        let docs = loader.expand(&urls, &parent).await;

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].metadata.kind, DocKind::MediaCaption);
        assert_eq!(docs[0].metadata.title, "Week 1");
        assert_eq!(
            docs[0].metadata.course_context.as_deref(),
            Some("https://c/pages/week-1")
        );
        assert_eq!(docs[0].metadata.media_id.as_deref(), Some("1_x"));
    }

    #[tokio::test]
    async fn test_duplicate_media_id_fetched_once() {
        let fetcher = Arc::new(CountingFetcher {
            calls: Mutex::new(0),
            fail_unauthorized: false,
        });
        let run = Arc::new(RunContext::new());
        let loader =
            MediaCaptionLoader::new(Some(fetcher.clone()), run, "media.example.edu");

        let parent = DocMetadata::new(DocKind::Page, "Week 1", "https://c/pages/week-1");
        let urls = vec![
            "https://media.example.edu/embed/entryid/1_x/ui".to_string(),
            "https://media.example.edu/embed/entryid/1_x/ui".to_string(),
        ];
        let docs = loader.expand(&urls, &parent).await;

        assert_eq!(docs.len(), 1);
        assert_eq!(*fetcher.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_is_sticky() {
        let fetcher = Arc::new(CountingFetcher {
            calls: Mutex::new(0),
            fail_unauthorized: true,
        });
        let run = Arc::new(RunContext::new());
        let loader =
            MediaCaptionLoader::new(Some(fetcher.clone()), run, "media.example.edu");

        let parent = DocMetadata::new(DocKind::Page, "Week 1", "https://c/pages/week-1");
        let first = vec!["https://media.example.edu/embed/entryid/1_a/ui".to_string()];
        assert!(loader.expand(&first, &parent).await.is_empty());
        assert!(!loader.is_authorized());

        // A different media id must not trigger another fetch
        let second = vec!["https://media.example.edu/embed/entryid/1_b/ui".to_string()];
        assert!(loader.expand(&second, &parent).await.is_empty());
        assert_eq!(*fetcher.calls.lock().unwrap(), 1);
    }
}
