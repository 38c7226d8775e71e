//! Crawl engine: bounded concurrent page fetching
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - Depth bounding of follow-up requests
//! - Handing each fetched page's anchors to a [`PageHandler`]
//! - Draining the work queue (`wait_until_drained`), the single join point
//!   of a crawl
//!
//! Handlers run synchronously on the runtime's worker threads, after all
//! network I/O for the page has completed, so several handlers may run in
//! parallel against different pages.

use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::{extract_anchors, LinkElement};
use crate::state::{PageRole, TRANSPORT_FAILURE_STATUS};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// The page whose elements are being handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// The URL that was requested
    pub url: Url,

    /// The URL the response was served from, after redirects; relative
    /// links on the page resolve against it
    pub base: Url,

    /// The page's position in the link hierarchy
    pub role: PageRole,

    /// Link-follow hops from the root page
    pub depth: u32,
}

/// A request from a handler to fetch another page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowLink {
    pub url: Url,
    pub role: PageRole,
}

/// Callbacks invoked by the engine for each fetched page
pub trait PageHandler: Send + Sync + 'static {
    /// Called once per `<a href>` element on a successfully fetched page
    ///
    /// Returning `Some` asks the engine to fetch another page one level
    /// deeper; the engine drops requests beyond its maximum depth.
    fn on_element(&self, page: &PageContext, element: &LinkElement) -> Option<FollowLink>;

    /// Called after every element of a page has been handled
    fn on_page_complete(&self, _page: &PageContext) {}

    /// Called when a page could not be fetched
    fn on_error(&self, page: &PageContext, status_code: u16, message: &str);
}

/// Counters kept by the engine over one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Pages fetched and handed to the handler
    pub pages_fetched: u64,

    /// Pages whose fetch failed
    pub pages_failed: u64,

    /// Follow requests dropped by the depth bound
    pub links_beyond_depth: u64,
}

/// What a finished page task hands back to the engine
struct PageOutcome {
    depth: u32,
    fetched: bool,
    follows: Vec<FollowLink>,
}

/// Engine driving fetches through a bounded pool of concurrent workers
pub struct CrawlEngine<H: PageHandler> {
    client: Client,
    handler: Arc<H>,
    permits: Arc<Semaphore>,
    max_depth: u32,
    tasks: JoinSet<PageOutcome>,
    stats: EngineStats,
}

impl<H: PageHandler> CrawlEngine<H> {
    /// Creates a new engine
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for every fetch
    /// * `handler` - Receives page elements and fetch errors
    /// * `max_concurrent` - Maximum number of fetches in flight
    /// * `max_depth` - Deepest page (in hops from the seed) that will be fetched
    pub fn new(client: Client, handler: Arc<H>, max_concurrent: usize, max_depth: u32) -> Self {
        Self {
            client,
            handler,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            max_depth,
            tasks: JoinSet::new(),
            stats: EngineStats::default(),
        }
    }

    /// Enqueues a page fetch
    ///
    /// Must be called from within a Tokio runtime. Returns false if the page
    /// lies beyond the maximum depth and was dropped.
    pub fn visit(&mut self, url: Url, role: PageRole, depth: u32) -> bool {
        if depth > self.max_depth {
            tracing::debug!(
                "Not following {} ({}): depth {} exceeds {}",
                url,
                role,
                depth,
                self.max_depth
            );
            self.stats.links_beyond_depth += 1;
            return false;
        }

        tracing::debug!("Queueing {} as {} at depth {}", url, role, depth);

        let page = PageContext {
            base: url.clone(),
            url,
            role,
            depth,
        };
        let client = self.client.clone();
        let handler = Arc::clone(&self.handler);
        let permits = Arc::clone(&self.permits);

        self.tasks.spawn(async move {
            let worker = tokio::spawn(process_page(
                client,
                Arc::clone(&handler),
                permits,
                page.clone(),
            ));
            match worker.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Page task for {} did not complete: {}", page.url, e);
                    let message = format!("Page processing aborted: {}", page.url);
                    handler.on_error(&page, TRANSPORT_FAILURE_STATUS, &message);
                    PageOutcome {
                        depth: page.depth,
                        fetched: false,
                        follows: Vec::new(),
                    }
                }
            }
        });
        true
    }

    /// Waits until every queued page, and every page those pages queued,
    /// has been processed
    pub async fn wait_until_drained(&mut self) -> EngineStats {
        while let Some(joined) = self.tasks.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Page task did not complete: {}", e);
                    self.stats.pages_failed += 1;
                    continue;
                }
            };

            if outcome.fetched {
                self.stats.pages_fetched += 1;
                if self.stats.pages_fetched % 10 == 0 {
                    tracing::info!(
                        "Progress: {} pages fetched, {} in flight",
                        self.stats.pages_fetched,
                        self.tasks.len()
                    );
                }
            } else {
                self.stats.pages_failed += 1;
            }

            for follow in outcome.follows {
                self.visit(follow.url, follow.role, outcome.depth + 1);
            }
        }

        self.stats.clone()
    }

    /// Counters so far
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }
}

/// Fetches one page and runs the handler over it
async fn process_page<H: PageHandler>(
    client: Client,
    handler: Arc<H>,
    permits: Arc<Semaphore>,
    mut page: PageContext,
) -> PageOutcome {
    let depth = page.depth;

    let fetch_result = {
        let Ok(_permit) = permits.acquire_owned().await else {
            tracing::error!("Worker pool closed before {} was fetched", page.url);
            return PageOutcome {
                depth,
                fetched: false,
                follows: Vec::new(),
            };
        };
        fetch_url(&client, &page.url).await
    };

    match fetch_result {
        FetchResult::Success {
            final_url,
            status_code,
            body,
        } => {
            tracing::debug!(
                "Fetched {} ({}, final URL {}, {} bytes)",
                page.url,
                status_code,
                final_url,
                body.len()
            );
            page.base = final_url;
            let follows = handle_page(&*handler, &page, &body);
            PageOutcome {
                depth,
                fetched: true,
                follows,
            }
        }
        failed => {
            let (status_code, reason) = failed.failure().unwrap_or_default();
            let message = format!("{}: {}", reason, page.url);
            tracing::warn!("Failed to fetch {} ({}): {}", page.url, status_code, reason);
            handler.on_error(&page, status_code, &message);
            PageOutcome {
                depth,
                fetched: false,
                follows: Vec::new(),
            }
        }
    }
}

/// Runs the handler over every anchor of a fetched page
fn handle_page<H: PageHandler>(handler: &H, page: &PageContext, body: &str) -> Vec<FollowLink> {
    let follows = extract_anchors(body)
        .iter()
        .filter_map(|element| handler.on_element(page, element))
        .collect();
    handler.on_page_complete(page);
    follows
}
