/// Canonical item keys and the run-wide deduplication index
///
/// The same logical item can be discovered through more than one traversal
/// path (a page appears in the flat Pages listing and inside a module).
/// Every loader claims an item's key before extracting it; whichever path
/// claims first wins and the other path does no work.
use std::collections::HashSet;
use std::fmt;

/// Canonical identity of one logical content item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKey {
    Page(i64),
    Assignment(i64),
    File(i64),
    ExternalUrl(String),
    Media(String),
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(id) => write!(f, "Page:{}", id),
            Self::Assignment(id) => write!(f, "Assignment:{}", id),
            Self::File(id) => write!(f, "File:{}", id),
            Self::ExternalUrl(url) => write!(f, "ExtUrl:{}", url),
            Self::Media(id) => write!(f, "Media:{}", id),
        }
    }
}

/// Set of item keys already claimed during this run
#[derive(Debug, Default)]
pub struct DedupIndex {
    seen: HashSet<ItemKey>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key` for the caller.
    ///
    /// Returns true (and records the key) if it was not present; returns
    /// false if some earlier path already claimed it. Callers must skip
    /// extraction entirely on a false result.
    pub fn test_and_mark(&mut self, key: ItemKey) -> bool {
        self.seen.insert(key)
    }

    /// Returns true if `key` has already been claimed
    pub fn contains(&self, key: &ItemKey) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
