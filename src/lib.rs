//! Transit-Mapper: a bus route and stop discovery crawler
//!
//! This crate walks a transit agency's route-listing site two levels deep
//! (route listing, then one page per route) and collects the routes and the
//! stops each route serves, exporting the result as CSV tables.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Transit-Mapper operations
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Transit-Mapper operations
pub type Result<T> = std::result::Result<T, MapperError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, CrawlController, CrawlOutcome};
pub use state::{CrawlError, PageRole, ResultAggregator};
pub use url::{classify_link, LinkKind, RouteId, StopId};
