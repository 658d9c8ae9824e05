//! Courseharvest: a course-content harvester
//!
//! This crate walks a remote course-management API and flattens its content
//! (pages, announcements, assignments, files, modules, syllabus, embedded
//! media captions) into a uniform list of text documents for downstream
//! indexing, deduplicating items that are reachable through more than one
//! traversal path.

pub mod captions;
pub mod config;
pub mod document;
pub mod extract;
pub mod gateway;
pub mod harvester;
pub mod sections;
pub mod state;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Course {course_id} is not accessible: {reason}")]
    CourseUnavailable { course_id: i64, reason: String },

    #[error("Remote service error: {0}")]
    Gateway(#[from] gateway::GatewayError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::HarvestConfig;
pub use document::{DocKind, DocMetadata, Document};
pub use extract::formats::ExtractorSet;
pub use harvester::CourseHarvester;
pub use state::{ItemKey, LogLevel, LogStatement};
