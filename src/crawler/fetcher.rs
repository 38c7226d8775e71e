//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Error classification
//!
//! Each URL is attempted exactly once; there is no retry.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::state::TRANSPORT_FAILURE_STATUS;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// Canonical reason phrase, e.g. "Internal Server Error"
        reason: String,
    },

    /// Network error (connection refused, timeout, unreadable body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Status code and message for the error table, or None on success
    pub fn failure(&self) -> Option<(u16, String)> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError {
                status_code,
                reason,
            } => Some((*status_code, reason.clone())),
            Self::NetworkError { error } => Some((TRANSPORT_FAILURE_STATUS, error.clone())),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use transit_mapper::config::{CrawlerConfig, UserAgentConfig};
/// use transit_mapper::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(crawler.request_timeout.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once and classifies the outcome
///
/// | Condition              | Result                           |
/// |------------------------|----------------------------------|
/// | 2xx                    | `Success` with the body          |
/// | any other status       | `HttpError` with status + reason |
/// | timeout                | `NetworkError("Request timeout")`|
/// | connection failure     | `NetworkError("Connection refused")` |
/// | body read failure etc. | `NetworkError` with the error    |
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    match client.get(url.clone()).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().clone();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                    reason: status
                        .canonical_reason()
                        .unwrap_or("Unknown Status")
                        .to_string(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: "Connection refused".to_string(),
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                }
            }
        }
    }
}
