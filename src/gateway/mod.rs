//! Thin accessor over the remote course-management API
//!
//! The gateway owns transport only: building the authenticated client,
//! per-category listing calls, single-item fetches, and pagination. Policy
//! (dedup, lock handling, dispatch) lives in the section loaders.

mod client;
mod types;

pub use client::{parse_next_link, Gateway};
pub use types::{
    Announcement, Assignment, Course, CourseFile, CoursePage, Module, ModuleItem, ModuleItemKind,
    Tab,
};

use thiserror::Error;

/// Errors surfaced by remote-service calls
///
/// The gateway performs a single attempt per call; classification is the
/// caller's signal for how to degrade (a NotFound file is recorded as
/// invalid, an Unauthorized course is fatal, anything else is a warning).
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    #[error("Resource not found: {url}")]
    NotFound { url: String },

    #[error("Access denied for {url} (HTTP {status})")]
    Unauthorized { url: String, status: u16 },

    #[error("Unexpected HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
