//! Crawler module for route and stop discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - Anchor extraction from HTML
//! - The bounded concurrent crawl engine
//! - The crawl controller that classifies links and records results

mod controller;
mod engine;
mod fetcher;
mod parser;

pub use controller::CrawlController;
pub use engine::{CrawlEngine, EngineStats, FollowLink, PageContext, PageHandler};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use parser::{extract_anchors, LinkElement};

use crate::config::{validate, Config};
use crate::state::{AggregateSnapshot, CrawlError, PageRole};
use crate::url::normalize_url;
use crate::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything a finished crawl hands to the exporter
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Discovered routes and stops
    pub snapshot: AggregateSnapshot,

    /// Failed fetches, in the order they were recorded
    pub errors: Vec<CrawlError>,

    /// Engine counters
    pub stats: EngineStats,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and build the HTTP client
/// 2. Queue the root listing page
/// 3. Let the engine fetch route pages as the controller discovers them
/// 4. Wait for the engine to drain
/// 5. Snapshot the results
///
/// Fetch failures do not fail the crawl; they are returned in
/// [`CrawlOutcome::errors`].
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl ran to completion
/// * `Err(MapperError)` - The configuration is invalid or the crawl could
///   not be started
///
/// # Example
///
/// ```no_run
/// use transit_mapper::config::Config;
/// use transit_mapper::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_crawl(&Config::default()).await?;
/// println!("{} routes", outcome.snapshot.routes.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlOutcome> {
    validate(config)?;
    let root = normalize_url(&config.crawler.root_url)?;
    let client = build_http_client(&config.user_agent, &config.crawler)?;
    let controller = Arc::new(CrawlController::new());

    let mut engine = CrawlEngine::new(
        client,
        Arc::clone(&controller),
        config.crawler.max_concurrent_pages_open as usize,
        config.crawler.max_depth,
    );

    tracing::info!("Starting crawl at {}", root);
    let start_time = Instant::now();

    engine.visit(root, PageRole::Initial, 0);
    let stats = engine.wait_until_drained().await;

    let elapsed = start_time.elapsed();
    tracing::info!(
        "Crawl drained: {} pages fetched, {} failed in {:?}",
        stats.pages_fetched,
        stats.pages_failed,
        elapsed
    );

    Ok(CrawlOutcome {
        snapshot: controller.snapshot(),
        errors: controller.error_snapshot(),
        stats,
        elapsed,
    })
}
