//! Run context shared by every component of one harvest
//!
//! The dedup index, the structured log, and the invalid-file records are
//! the only mutable state of a run. They are owned by a single
//! [`RunContext`] handed to every loader at construction, so no component
//! reaches for globals and a fresh harvester starts from a clean slate.

use crate::state::{DedupIndex, ItemKey, LogLevel, LogStatement, RunLog};
use std::sync::Mutex;

/// Shared mutable state for one harvest run
#[derive(Debug, Default)]
pub struct RunContext {
    dedup: Mutex<DedupIndex>,
    log: Mutex<RunLog>,
    invalid_files: Mutex<Vec<String>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key`; true means the caller owns extraction of that item
    pub fn test_and_mark(&self, key: ItemKey) -> bool {
        self.dedup.lock().unwrap().test_and_mark(key)
    }

    /// Returns true if `key` was already claimed
    pub fn is_marked(&self, key: &ItemKey) -> bool {
        self.dedup.lock().unwrap().contains(key)
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log.lock().unwrap().log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log.lock().unwrap().log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log.lock().unwrap().log(LogLevel::Warning, message);
    }

    /// Records a file that no registered extractor can handle
    pub fn record_invalid_file(&self, filename: &str, content_type: &str) {
        self.invalid_files
            .lock()
            .unwrap()
            .push(format!("{} ({})", filename, content_type));
    }

    pub fn statements(&self) -> Vec<LogStatement> {
        self.log.lock().unwrap().statements().to_vec()
    }

    pub fn statements_at(&self, level: LogLevel) -> Vec<LogStatement> {
        self.log.lock().unwrap().statements_at(level)
    }

    pub fn errors(&self) -> Vec<LogStatement> {
        self.log.lock().unwrap().errors().to_vec()
    }

    pub fn warning_count(&self) -> usize {
        self.log.lock().unwrap().errors().len()
    }

    pub fn invalid_files(&self) -> Vec<String> {
        self.invalid_files.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_through_context() {
        let ctx = RunContext::new();
        assert!(ctx.test_and_mark(ItemKey::Assignment(3)));
        assert!(!ctx.test_and_mark(ItemKey::Assignment(3)));
        assert!(ctx.is_marked(&ItemKey::Assignment(3)));
    }

    #[test]
    fn test_invalid_file_record_format() {
        let ctx = RunContext::new();
        ctx.record_invalid_file("archive.zip", "application/zip");
        assert_eq!(ctx.invalid_files(), vec!["archive.zip (application/zip)"]);
    }

    #[test]
    fn test_warning_count() {
        let ctx = RunContext::new();
        ctx.info("starting");
        ctx.warn("category failed");
        ctx.warn("item failed");
        assert_eq!(ctx.warning_count(), 2);
        assert_eq!(ctx.statements().len(), 3);
    }
}
