//! Generic external-URL document loader
//!
//! Module items can point at arbitrary web pages outside the course system.
//! These are fetched with a dedicated client that carries no course
//! credentials, so the bearer token never leaves the course API host.

use crate::document::{DocKind, DocMetadata, Document};
use crate::extract::html::extract_html;
use reqwest::Client;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WebPageLoader {
    client: Client,
}

impl WebPageLoader {
    pub fn new() -> Self {
        // Unauthenticated on purpose
        let client = Client::builder()
            .user_agent(concat!("courseharvest/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Fetches `url` and converts the response into one text document
    ///
    /// Non-HTML responses and non-success statuses yield an error string
    /// for the caller to log; this loader makes a single attempt.
    pub async fn load_url(&self, url: &str, title: &str) -> Result<Vec<Document>, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("fetch failed for {}: {}", url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {} for {}", status.as_u16(), url));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|e| format!("body read failed for {}: {}", url, e))?;

        let text = if content_type.contains("text/html") {
            extract_html(&body).text
        } else if content_type.starts_with("text/") || content_type.is_empty() {
            body.trim().to_string()
        } else {
            return Err(format!(
                "unsupported content type {} for {}",
                content_type, url
            ));
        };

        if text.is_empty() {
            return Ok(Vec::new());
        }

        let metadata = DocMetadata::new(DocKind::ExternalUrl, title, url);
        Ok(vec![Document::new(text, metadata)])
    }
}

impl Default for WebPageLoader {
    fn default() -> Self {
        Self::new()
    }
}
