use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing output tables
///
/// Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Failed to flush {}: {source}", .path.display())]
    Flush {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
