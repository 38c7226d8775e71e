use super::lock;
use std::fmt;
use std::sync::Mutex;

/// Status code recorded when a fetch fails before any response arrives
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// A failed page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlError {
    /// HTTP status code, or 0 for transport failures
    pub status_code: u16,

    /// Failure description
    pub message: String,
}

impl fmt::Display for CrawlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status_code, self.message)
    }
}

/// Append-only, concurrency-safe log of failed fetches
///
/// Identical failures are kept once each.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Mutex<Vec<CrawlError>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, status_code: u16, message: impl Into<String>) {
        lock(&self.errors).push(CrawlError {
            status_code,
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        lock(&self.errors).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of all errors in recording order
    pub fn snapshot(&self) -> Vec<CrawlError> {
        lock(&self.errors).clone()
    }
}
