//! Configuration module for Transit-Mapper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so a run without a config file crawls the
//! default route listing with the default output directory.
//!
//! # Example
//!
//! ```no_run
//! use transit_mapper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("transit-mapper.toml")).unwrap();
//! println!("Crawling routes from: {}", config.crawler.root_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_ROOT_URL};

// Re-export parser functions
pub use parser::{content_hash, load_config, load_config_with_hash};
pub use validation::validate;
