//! State module for tracking crawl progress
//!
//! This module holds everything the crawl shares between worker threads.
//!
//! # Components
//!
//! - `PageRole`: Where a page sits in the two-level link hierarchy
//! - `VisitedTracker`: Best-effort dedup of processed page URLs
//! - `ResultAggregator`: Discovered routes, stop names and stop-to-route associations
//! - `ErrorCollector`: Append-only log of failed fetches
//!
//! Each container has its own lock. No operation spans two containers, so a
//! page processed twice only repeats idempotent writes.

mod aggregator;
mod error_collector;
mod page_role;
mod visited;

pub use aggregator::{AggregateSnapshot, ResultAggregator, RouteSet, StopNames, StopRecord, StopRoutes};
pub use error_collector::{CrawlError, ErrorCollector, TRANSPORT_FAILURE_STATUS};
pub use page_role::PageRole;
pub use visited::VisitedTracker;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the guard if a previous holder panicked.
///
/// Every critical section in this module leaves its container consistent
/// before it can panic, so the data behind a poisoned lock is still usable.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
