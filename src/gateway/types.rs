//! Serde models for the remote API's JSON payloads

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// The course container being harvested
#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub syllabus_body: Option<String>,
}

/// A navigation tab; presence of a tab gates the matching category loader
#[derive(Debug, Clone, Deserialize)]
pub struct Tab {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// One wiki page
#[derive(Debug, Clone, Deserialize)]
pub struct CoursePage {
    pub page_id: i64,

    /// URL slug, used both for the canonical page URL and single-page fetches
    pub url: String,

    pub title: String,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub locked_for_user: bool,
}

/// One announcement
#[derive(Debug, Clone, Deserialize)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    pub html_url: String,
}

/// One assignment
#[derive(Debug, Clone, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub points_possible: Option<f64>,
    pub html_url: String,
}

/// One file entry from the files listing
#[derive(Debug, Clone, Deserialize)]
pub struct CourseFile {
    pub id: i64,

    pub filename: String,

    /// The remote reports this under a hyphenated key
    #[serde(rename = "content-type")]
    pub content_type: String,

    /// Download URL for the file's bytes
    pub url: String,
}

/// One module: an ordered, optionally time-locked grouping of items
#[derive(Debug, Clone, Deserialize)]
pub struct Module {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub unlock_at: Option<DateTime<Utc>>,
}

/// Item types a module can reference
///
/// The remote reports free-form type strings; anything unrecognized lands in
/// `Other` so new types degrade to a logged skip instead of a silent fall
/// through.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ModuleItemKind {
    Page,
    Assignment,
    File,
    ExternalUrl,
    Other(String),
}

impl From<String> for ModuleItemKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Page" => Self::Page,
            "Assignment" => Self::Assignment,
            "File" => Self::File,
            "ExternalUrl" => Self::ExternalUrl,
            _ => Self::Other(s),
        }
    }
}

impl fmt::Display for ModuleItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => write!(f, "Page"),
            Self::Assignment => write!(f, "Assignment"),
            Self::File => write!(f, "File"),
            Self::ExternalUrl => write!(f, "ExternalUrl"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

/// One item inside a module
///
/// Which of the optional reference fields is populated depends on the item
/// type: pages carry `page_url`, assignments and files carry `content_id`,
/// external URLs carry `external_url`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleItem {
    pub id: i64,
    pub title: String,

    #[serde(rename = "type")]
    pub kind: ModuleItemKind,

    #[serde(default)]
    pub content_id: Option<i64>,

    #[serde(default)]
    pub page_url: Option<String>,

    #[serde(default)]
    pub external_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_item_kind_from_string() {
        assert_eq!(ModuleItemKind::from("Page".to_string()), ModuleItemKind::Page);
        assert_eq!(
            ModuleItemKind::from("ExternalUrl".to_string()),
            ModuleItemKind::ExternalUrl
        );
        assert_eq!(
            ModuleItemKind::from("Quiz".to_string()),
            ModuleItemKind::Other("Quiz".to_string())
        );
    }

    #[test]
    fn test_module_item_deserializes_unknown_type() {
        let item: ModuleItem = serde_json::from_str(
            r#"{"id": 1, "title": "Week 1 quiz", "type": "Quiz"}"#,
        )
        .unwrap();
        assert_eq!(item.kind, ModuleItemKind::Other("Quiz".to_string()));
        assert!(item.content_id.is_none());
    }

    #[test]
    fn test_file_content_type_key() {
        let file: CourseFile = serde_json::from_str(
            r#"{"id": 7, "filename": "notes.pdf", "content-type": "application/pdf", "url": "https://files.example.edu/7/download"}"#,
        )
        .unwrap();
        assert_eq!(file.content_type, "application/pdf");
    }

    #[test]
    fn test_module_unlock_at_parses() {
        let module: Module = serde_json::from_str(
            r#"{"id": 3, "name": "Week 2", "unlock_at": "2030-01-15T05:00:00Z"}"#,
        )
        .unwrap();
        assert!(module.unlock_at.is_some());

        let module: Module =
            serde_json::from_str(r#"{"id": 4, "name": "Week 3", "unlock_at": null}"#).unwrap();
        assert!(module.unlock_at.is_none());
    }
}
