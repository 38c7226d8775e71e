use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};
use url::Url;

/// Concurrency-safe set of page URLs that have been processed
///
/// Reads take a shared lock and marks an exclusive one, so readers never see
/// a half-inserted entry. A check followed by a mark from two threads is not
/// atomic: two workers can both see a URL as unvisited and both process it.
/// The result containers absorb the duplicate writes.
#[derive(Debug, Default)]
pub struct VisitedTracker {
    urls: RwLock<HashSet<String>>,
}

impl VisitedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as processed
    ///
    /// Returns true if the URL was not already marked.
    pub fn mark_visited(&self, url: &Url) -> bool {
        self.urls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.as_str().to_string())
    }

    /// Returns true if the URL has been marked
    pub fn is_visited(&self, url: &Url) -> bool {
        self.urls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url.as_str())
    }

    /// Number of distinct URLs marked so far
    pub fn len(&self) -> usize {
        self.urls.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
