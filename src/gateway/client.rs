//! HTTP client for the remote course-management API
//!
//! All calls are single-attempt: classification of the failure is the
//! caller's retry policy. Listing endpoints are paginated by the remote via
//! RFC-5988 `Link` headers and are walked to exhaustion here so callers
//! always see complete listings.

use crate::gateway::types::{
    Announcement, Assignment, Course, CourseFile, CoursePage, Module, ModuleItem, Tab,
};
use crate::gateway::{GatewayError, GatewayResult};
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, LINK};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Listing page size requested from the remote
const PER_PAGE: &str = "100";

/// Synchronous-in-spirit accessor over the remote API
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    api_base: String,
    course_id: i64,
}

impl Gateway {
    /// Builds an authenticated gateway for one course
    ///
    /// # Arguments
    ///
    /// * `api_url` - Base URL of the remote API (scheme + host)
    /// * `api_key` - Bearer token for the harvesting account
    /// * `course_id` - Course to address
    pub fn new(api_url: &str, api_key: &str, course_id: i64) -> GatewayResult<Self> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", api_key);
        let mut auth_value = HeaderValue::from_str(&bearer)
            .map_err(|_| GatewayError::InvalidUrl("api key contains invalid bytes".into()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = Client::builder()
            .user_agent(concat!("courseharvest/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| GatewayError::Http {
                url: api_url.to_string(),
                source: e,
            })?;

        Ok(Self {
            client,
            api_base: api_url.trim_end_matches('/').to_string(),
            course_id,
        })
    }

    pub fn course_id(&self) -> i64 {
        self.course_id
    }

    /// Base URL for user-facing course links, e.g. page and file sources
    pub fn course_url(&self, suffix: &str) -> String {
        format!("{}/courses/{}/{}", self.api_base, self.course_id, suffix)
    }

    fn api_url(&self, suffix: &str) -> String {
        format!(
            "{}/api/v1/courses/{}/{}",
            self.api_base, self.course_id, suffix
        )
    }

    /// Fetches the course record including its syllabus body
    ///
    /// An authorization failure here means the course is not accessible at
    /// all, which callers treat as fatal.
    pub async fn fetch_course(&self) -> GatewayResult<Course> {
        let url = format!("{}/api/v1/courses/{}", self.api_base, self.course_id);
        self.get_json(&url, &[("include[]", "syllabus_body")]).await
    }

    pub async fn list_tabs(&self) -> GatewayResult<Vec<Tab>> {
        self.get_list(self.api_url("tabs"), &[]).await
    }

    pub async fn list_pages(&self) -> GatewayResult<Vec<CoursePage>> {
        self.get_list(
            self.api_url("pages"),
            &[("published", "true"), ("include[]", "body")],
        )
        .await
    }

    pub async fn get_page(&self, slug: &str) -> GatewayResult<CoursePage> {
        let url = self.api_url(&format!("pages/{}", slug));
        self.get_json(&url, &[]).await
    }

    /// Lists announcements within the given date window (inclusive)
    pub async fn list_announcements(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> GatewayResult<Vec<Announcement>> {
        let url = format!("{}/api/v1/announcements", self.api_base);
        let context = format!("course_{}", self.course_id);
        let start = start_date.to_string();
        let end = end_date.to_string();
        self.get_list(
            url,
            &[
                ("context_codes[]", context.as_str()),
                ("start_date", start.as_str()),
                ("end_date", end.as_str()),
            ],
        )
        .await
    }

    pub async fn list_assignments(&self) -> GatewayResult<Vec<Assignment>> {
        self.get_list(self.api_url("assignments"), &[]).await
    }

    pub async fn get_assignment(&self, assignment_id: i64) -> GatewayResult<Assignment> {
        let url = self.api_url(&format!("assignments/{}", assignment_id));
        self.get_json(&url, &[]).await
    }

    pub async fn list_files(&self) -> GatewayResult<Vec<CourseFile>> {
        self.get_list(self.api_url("files"), &[]).await
    }

    pub async fn get_file(&self, file_id: i64) -> GatewayResult<CourseFile> {
        let url = self.api_url(&format!("files/{}", file_id));
        self.get_json(&url, &[]).await
    }

    pub async fn list_modules(&self) -> GatewayResult<Vec<Module>> {
        self.get_list(self.api_url("modules"), &[]).await
    }

    pub async fn list_module_items(&self, module_id: i64) -> GatewayResult<Vec<ModuleItem>> {
        self.get_list(
            self.api_url(&format!("modules/{}/items", module_id)),
            &[("include[]", "content_details")],
        )
        .await
    }

    /// Resolves an opaque embed-lookup UUID to a concrete resource URL
    ///
    /// Returns `Ok(None)` when the remote does not know the UUID; only
    /// transport-level failures surface as errors.
    pub async fn resolve_embed_url(&self, uuid: &str) -> GatewayResult<Option<String>> {
        #[derive(Deserialize)]
        struct ResourceLink {
            #[serde(default)]
            url: Option<String>,
        }

        let url = self.api_url(&format!("lti_resource_links/lookup_uuid:{}", uuid));
        match self.get_json::<ResourceLink>(&url, &[]).await {
            Ok(link) => Ok(link.url),
            Err(GatewayError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Downloads a file body as text
    pub async fn fetch_text(&self, url: &str) -> GatewayResult<String> {
        let response = self.get_checked(url, &[]).await?;
        response.text().await.map_err(|e| GatewayError::Http {
            url: url.to_string(),
            source: e,
        })
    }

    /// Downloads a file body as raw bytes
    pub async fn fetch_bytes(&self, url: &str) -> GatewayResult<Vec<u8>> {
        let response = self.get_checked(url, &[]).await?;
        let bytes = response.bytes().await.map_err(|e| GatewayError::Http {
            url: url.to_string(),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }

    async fn get_checked(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> GatewayResult<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| GatewayError::Http {
                url: url.to_string(),
                source: e,
            })?;
        check_status(url, response.status())?;
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> GatewayResult<T> {
        let response = self.get_checked(url, query).await?;
        let body = response.text().await.map_err(|e| GatewayError::Http {
            url: url.to_string(),
            source: e,
        })?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode {
            url: url.to_string(),
            source: e,
        })
    }

    /// Fetches a listing endpoint, following `Link: rel="next"` pages
    async fn get_list<T: DeserializeOwned>(
        &self,
        first_url: String,
        query: &[(&str, &str)],
    ) -> GatewayResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next_url: Option<String> = None;

        loop {
            // Next-page links already carry their query string
            let request = match &next_url {
                Some(url) => self.client.get(url),
                None => self
                    .client
                    .get(&first_url)
                    .query(query)
                    .query(&[("per_page", PER_PAGE)]),
            };

            let url_for_errors = next_url.clone().unwrap_or_else(|| first_url.clone());
            let response = request.send().await.map_err(|e| GatewayError::Http {
                url: url_for_errors.clone(),
                source: e,
            })?;
            check_status(&url_for_errors, response.status())?;

            let next = response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_next_link);

            let body = response.text().await.map_err(|e| GatewayError::Http {
                url: url_for_errors.clone(),
                source: e,
            })?;
            let mut page: Vec<T> =
                serde_json::from_str(&body).map_err(|e| GatewayError::Decode {
                    url: url_for_errors,
                    source: e,
                })?;
            items.append(&mut page);

            match next {
                Some(url) => next_url = Some(url),
                None => break,
            }
        }

        Ok(items)
    }
}

fn check_status(url: &str, status: StatusCode) -> GatewayResult<()> {
    if status == StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound {
            url: url.to_string(),
        });
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(GatewayError::Unauthorized {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    if !status.is_success() {
        return Err(GatewayError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(())
}

/// Extracts the `rel="next"` target from an RFC-5988 `Link` header value
pub fn parse_next_link(header: &str) -> Option<String> {
    for part in header.split(',') {
        let Some((target, params)) = part.trim().split_once(';') else {
            continue;
        };
        if params.contains("rel=\"next\"") {
            let target = target.trim();
            return target
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .map(str::to_string);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_next_link() {
        let header = r#"<https://x.edu/api/v1/courses/1/pages?page=2>; rel="next", <https://x.edu/api/v1/courses/1/pages?page=5>; rel="last""#;
        assert_eq!(
            parse_next_link(header).as_deref(),
            Some("https://x.edu/api/v1/courses/1/pages?page=2")
        );
    }

    #[test]
    fn test_parse_next_link_absent() {
        let header = r#"<https://x.edu/api/v1/courses/1/pages?page=1>; rel="first""#;
        assert_eq!(parse_next_link(header), None);
    }

    #[test]
    fn test_parse_next_link_malformed() {
        assert_eq!(parse_next_link("garbage"), None);
        assert_eq!(parse_next_link(""), None);
    }

    #[test]
    fn test_course_url_shape() {
        let gateway = Gateway::new("https://courses.example.edu/", "token", 42).unwrap();
        assert_eq!(
            gateway.course_url("pages/intro"),
            "https://courses.example.edu/courses/42/pages/intro"
        );
    }
}
