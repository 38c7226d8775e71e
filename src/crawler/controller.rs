//! Crawl controller - per-page link handling
//!
//! The controller decides, for every anchor on a fetched page, what the
//! anchor means given the page's role:
//!
//! - On the root listing, route links are recorded and followed as
//!   route-detail pages.
//! - On a route-detail page, stop links are recorded against the page's
//!   route; links to other routes are ignored.
//! - Nothing is followed from a route-detail page, so stop pages are never
//!   fetched.
//!
//! Each page URL is marked visited after its links have been handled.

use crate::crawler::engine::{FollowLink, PageContext, PageHandler};
use crate::crawler::parser::LinkElement;
use crate::state::{
    AggregateSnapshot, CrawlError, ErrorCollector, PageRole, ResultAggregator, VisitedTracker,
};
use crate::url::{classify_link, LinkKind, RouteId};
use url::Url;

/// Shared crawl state plus the rules for updating it
#[derive(Debug, Default)]
pub struct CrawlController {
    visited: VisitedTracker,
    results: ResultAggregator,
    errors: ErrorCollector,
}

impl CrawlController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles one link found on the root listing
    ///
    /// Returns the route page to fetch, or None if the link is not a route
    /// or its page has already been processed.
    pub fn handle_root_link(&self, page_url: &Url, element: &LinkElement) -> Option<FollowLink> {
        match classify_link(&element.href, page_url, &PageRole::Initial) {
            LinkKind::Route { id, url } => {
                if self.results.routes.add(id.clone()) {
                    tracing::debug!("Discovered route {}", id);
                }

                if self.visited.is_visited(&url) {
                    tracing::trace!("Skipping already visited {}", url);
                    return None;
                }

                Some(FollowLink {
                    url,
                    role: PageRole::RouteDetail { route: id },
                })
            }
            LinkKind::Stop { .. } | LinkKind::Unclassified => {
                tracing::trace!("Skipping unclassified link {} on {}", element.href, page_url);
                None
            }
        }
    }

    /// Handles one link found on the page of `route`
    ///
    /// Stop links record the stop's name and associate the stop with
    /// `route`. Never asks for another page.
    pub fn handle_route_link(&self, route: &RouteId, page_url: &Url, element: &LinkElement) {
        let role = PageRole::RouteDetail {
            route: route.clone(),
        };

        match classify_link(&element.href, page_url, &role) {
            LinkKind::Stop { id } => {
                tracing::trace!("Route {} serves stop {} ({})", route, id, element.text);
                self.results
                    .stop_names
                    .add(id.clone(), element.text.clone());
                self.results.stop_routes.add(id, route.clone());
            }
            LinkKind::Route { id, .. } => {
                tracing::trace!("Ignoring link to route {} on route {} page", id, route);
            }
            LinkKind::Unclassified => {
                tracing::trace!("Skipping unclassified link {} on {}", element.href, page_url);
            }
        }
    }

    /// Marks a page as processed
    pub fn finish_page(&self, page_url: &Url) {
        self.visited.mark_visited(page_url);
    }

    /// Records a failed fetch
    pub fn record_error(&self, status_code: u16, message: &str) {
        self.errors.record(status_code, message);
    }

    pub fn visited(&self) -> &VisitedTracker {
        &self.visited
    }

    pub fn results(&self) -> &ResultAggregator {
        &self.results
    }

    pub fn errors(&self) -> &ErrorCollector {
        &self.errors
    }

    /// Sorted snapshot of the results; call once the crawl has drained
    pub fn snapshot(&self) -> AggregateSnapshot {
        self.results.snapshot()
    }

    /// All recorded fetch failures
    pub fn error_snapshot(&self) -> Vec<CrawlError> {
        self.errors.snapshot()
    }
}

impl PageHandler for CrawlController {
    fn on_element(&self, page: &PageContext, element: &LinkElement) -> Option<FollowLink> {
        match page.role.route() {
            None => self.handle_root_link(&page.base, element),
            Some(route) => {
                self.handle_route_link(route, &page.base, element);
                None
            }
        }
    }

    fn on_page_complete(&self, page: &PageContext) {
        self.finish_page(&page.url);
    }

    fn on_error(&self, page: &PageContext, status_code: u16, message: &str) {
        tracing::debug!("Recording failure for {} page {}", page.role.label(), page.url);
        self.record_error(status_code, message);
    }
}
