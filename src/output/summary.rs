//! Summary of a finished crawl

use crate::crawler::CrawlOutcome;
use std::collections::BTreeMap;
use std::time::Duration;

/// Summary statistics for a crawl
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlSummary {
    pub routes: usize,
    pub stops: usize,

    /// Stop/route pairs across all stops
    pub associations: usize,

    /// Stops with an empty display name
    pub unnamed_stops: usize,

    pub pages_fetched: u64,
    pub pages_failed: u64,
    pub links_beyond_depth: u64,

    /// Fetch failures by status code (0 = transport failure)
    pub errors_by_status: BTreeMap<u16, u64>,

    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Summarises a crawl outcome
    pub fn from_outcome(outcome: &CrawlOutcome) -> Self {
        let mut errors_by_status = BTreeMap::new();
        for error in &outcome.errors {
            *errors_by_status.entry(error.status_code).or_insert(0) += 1;
        }

        Self {
            routes: outcome.snapshot.routes.len(),
            stops: outcome.snapshot.stops.len(),
            associations: outcome.snapshot.association_count(),
            unnamed_stops: outcome
                .snapshot
                .stops
                .iter()
                .filter(|stop| stop.name.is_empty())
                .count(),
            pages_fetched: outcome.stats.pages_fetched,
            pages_failed: outcome.stats.pages_failed,
            links_beyond_depth: outcome.stats.links_beyond_depth,
            errors_by_status,
            elapsed: outcome.elapsed,
        }
    }

    pub fn total_errors(&self) -> u64 {
        self.errors_by_status.values().sum()
    }

    /// Returns the fetch success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_fetched + self.pages_failed;
        if attempted == 0 {
            return 0.0;
        }
        (self.pages_fetched as f64 / attempted as f64) * 100.0
    }

    /// Average number of routes serving each stop
    pub fn routes_per_stop(&self) -> f64 {
        if self.stops == 0 {
            return 0.0;
        }
        self.associations as f64 / self.stops as f64
    }
}
