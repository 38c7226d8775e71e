//! CSV export of the aggregated crawl results
//!
//! Rows are written in snapshot order (routes and stops sorted), so the same
//! snapshot always produces byte-identical files.

use crate::output::error::{OutputError, OutputResult};
use crate::state::{AggregateSnapshot, CrawlError};
use crate::url::RouteId;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const ROUTES_FILE: &str = "routes.csv";
pub const STOPS_FILE: &str = "stops.csv";
pub const ERRORS_FILE: &str = "errors.csv";

/// The errors table is written only when more errors than this were recorded
pub const ERROR_TABLE_THRESHOLD: usize = 1;

/// Files written by [`export_tables`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub routes_path: PathBuf,
    pub stops_path: PathBuf,

    /// Set when the errors table was written
    pub errors_path: Option<PathBuf>,

    /// Fetch errors recorded during the crawl, written or not
    pub error_count: usize,
}

impl ExportReport {
    /// True when any fetch failed, even if the errors table stayed below its
    /// threshold
    pub fn failed(&self) -> bool {
        self.error_count > 0
    }
}

/// Writes the routes and stops tables, and the errors table when more than
/// [`ERROR_TABLE_THRESHOLD`] fetch errors were recorded
///
/// # Tables
///
/// | File         | Columns                              |
/// |--------------|--------------------------------------|
/// | `routes.csv` | `routeId`                            |
/// | `stops.csv`  | `stopId`, `stopName`, `routes`       |
/// | `errors.csv` | `status code`, `error message`       |
///
/// The `routes` column joins a stop's route identifiers with commas.
///
/// # Returns
///
/// * `Ok(ExportReport)` - All tables written and flushed
/// * `Err(OutputError)` - A directory, file, write or flush failed; tables
///   written before the failure stay on disk
pub fn export_tables(
    snapshot: &AggregateSnapshot,
    errors: &[CrawlError],
    directory: &Path,
) -> OutputResult<ExportReport> {
    fs::create_dir_all(directory).map_err(|source| OutputError::CreateDir {
        path: directory.to_path_buf(),
        source,
    })?;

    let routes_path = directory.join(ROUTES_FILE);
    write_table(
        &routes_path,
        &["routeId"],
        snapshot.routes.iter().map(|route| vec![route.to_string()]),
    )?;
    tracing::info!(
        "Wrote {} routes to {}",
        snapshot.routes.len(),
        routes_path.display()
    );

    let stops_path = directory.join(STOPS_FILE);
    write_table(
        &stops_path,
        &["stopId", "stopName", "routes"],
        snapshot.stops.iter().map(|stop| {
            vec![
                stop.id.to_string(),
                stop.name.clone(),
                stop.routes
                    .iter()
                    .map(RouteId::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
            ]
        }),
    )?;
    tracing::info!(
        "Wrote {} stops to {}",
        snapshot.stops.len(),
        stops_path.display()
    );

    let errors_path = if errors.len() > ERROR_TABLE_THRESHOLD {
        let path = directory.join(ERRORS_FILE);
        write_table(
            &path,
            &["status code", "error message"],
            errors
                .iter()
                .map(|error| vec![error.status_code.to_string(), error.message.clone()]),
        )?;
        tracing::warn!("Wrote {} fetch errors to {}", errors.len(), path.display());
        Some(path)
    } else {
        if !errors.is_empty() {
            tracing::warn!(
                "{} fetch error recorded; errors table not written",
                errors.len()
            );
        }
        None
    };

    Ok(ExportReport {
        routes_path,
        stops_path,
        errors_path,
        error_count: errors.len(),
    })
}

/// Writes one CSV file with a header row
fn write_table<I>(path: &Path, header: &[&str], rows: I) -> OutputResult<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let csv_error = |source: csv::Error| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| csv_error(e.into()))?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(header).map_err(csv_error)?;
    for row in rows {
        writer.write_record(&row).map_err(csv_error)?;
    }

    writer.flush().map_err(|source| OutputError::Flush {
        path: path.to_path_buf(),
        source,
    })
}
