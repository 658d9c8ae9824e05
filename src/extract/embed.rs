//! Embedded-resource URL resolution
//!
//! Iframes in course bodies reference embedded resources in one of two
//! styles: a direct link through the course UI's retrieval endpoint
//! (the target URL is a query parameter), or an opaque lookup UUID that
//! only the remote system can resolve. The direct pattern is checked
//! first; UUID lookup is the fallback, and a failed lookup yields nothing
//! for that iframe.

use crate::gateway::Gateway;
use crate::state::RunContext;
use url::Url;

/// Query parameter carrying the opaque lookup UUID
const LOOKUP_UUID_PARAM: &str = "resource_link_lookup_uuid";

/// Path prefix/suffix of the UI's embed-retrieval endpoint
const COURSE_PATH_PREFIX: &str = "/courses/";
const RETRIEVE_PATH_SUFFIX: &str = "/external_tools/retrieve";

/// Attempts direct-pattern resolution of an iframe source
///
/// The source must live on the configured UI hostname and address the
/// course-scoped retrieval endpoint; the embedded resource URL is its
/// `url` query parameter.
pub fn resolve_direct(src: &str, ui_hostname: &str) -> Option<String> {
    if ui_hostname.is_empty() {
        return None;
    }

    let parsed = Url::parse(src).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    if host != ui_hostname.to_ascii_lowercase() {
        return None;
    }

    let path = parsed.path().to_ascii_lowercase();
    if !path.starts_with(COURSE_PATH_PREFIX) || !path.ends_with(RETRIEVE_PATH_SUFFIX) {
        return None;
    }

    parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
}

/// Extracts the opaque lookup UUID from an iframe source, if present
pub fn lookup_uuid(src: &str) -> Option<String> {
    let parsed = Url::parse(src).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == LOOKUP_UUID_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Resolves iframe sources to embedded-resource URLs, in encounter order
///
/// Sources that match neither style resolve to nothing; a UUID the remote
/// cannot resolve is logged at DEBUG and dropped. This never fails the
/// surrounding extraction.
pub async fn resolve_embeds(
    gateway: &Gateway,
    run: &RunContext,
    ui_hostname: &str,
    iframe_srcs: &[String],
) -> Vec<String> {
    let mut resolved = Vec::new();

    for src in iframe_srcs {
        if let Some(url) = resolve_direct(src, ui_hostname) {
            resolved.push(url);
            continue;
        }

        let Some(uuid) = lookup_uuid(src) else {
            continue;
        };
        match gateway.resolve_embed_url(&uuid).await {
            Ok(Some(url)) => resolved.push(url),
            Ok(None) => {
                run.debug(format!("Embed lookup UUID {} did not resolve", uuid));
            }
            Err(e) => {
                run.debug(format!("Embed lookup for UUID {} failed: {}", uuid, e));
            }
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    const UI_HOST: &str = "courses.example.edu";

    #[test]
    fn test_direct_pattern_match() {
        let src = "https://courses.example.edu/courses/42/external_tools/retrieve?display=borderless&url=https%3A%2F%2Fmedia.example.edu%2Fentry%2F1";
        assert_eq!(
            resolve_direct(src, UI_HOST).as_deref(),
            Some("https://media.example.edu/entry/1")
        );
    }

    #[test]
    fn test_direct_pattern_host_mismatch() {
        let src = "https://other.example.edu/courses/42/external_tools/retrieve?url=https%3A%2F%2Fm%2F1";
        assert_eq!(resolve_direct(src, UI_HOST), None);
    }

    #[test]
    fn test_direct_pattern_wrong_path() {
        let src = "https://courses.example.edu/accounts/1/external_tools/retrieve?url=https%3A%2F%2Fm%2F1";
        assert_eq!(resolve_direct(src, UI_HOST), None);

        let src = "https://courses.example.edu/courses/42/pages/intro?url=https%3A%2F%2Fm%2F1";
        assert_eq!(resolve_direct(src, UI_HOST), None);
    }

    #[test]
    fn test_direct_pattern_host_case_insensitive() {
        let src = "https://Courses.Example.EDU/courses/42/external_tools/retrieve?url=https%3A%2F%2Fm%2F1";
        assert_eq!(resolve_direct(src, UI_HOST).as_deref(), Some("https://m/1"));
    }

    #[test]
    fn test_direct_pattern_disabled_without_hostname() {
        let src = "https://courses.example.edu/courses/42/external_tools/retrieve?url=https%3A%2F%2Fm%2F1";
        assert_eq!(resolve_direct(src, ""), None);
    }

    #[test]
    fn test_lookup_uuid_present() {
        let src = "https://courses.example.edu/courses/42/external_tools/retrieve?resource_link_lookup_uuid=ab-12-cd";
        assert_eq!(lookup_uuid(src).as_deref(), Some("ab-12-cd"));
    }

    #[test]
    fn test_lookup_uuid_absent() {
        assert_eq!(lookup_uuid("https://media.example.edu/entry/1"), None);
        assert_eq!(lookup_uuid("not a url"), None);
    }
}
