//! Output module for exporting crawl results
//!
//! This module handles:
//! - Writing the routes, stops and errors tables as CSV
//! - Summarising a finished crawl
//! - Printing run statistics

mod csv_tables;
mod error;
pub mod stats;
mod summary;

pub use csv_tables::{
    export_tables, ExportReport, ERRORS_FILE, ERROR_TABLE_THRESHOLD, ROUTES_FILE, STOPS_FILE,
};
pub use error::{OutputError, OutputResult};
pub use stats::print_statistics;
pub use summary::CrawlSummary;
