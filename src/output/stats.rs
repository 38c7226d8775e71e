//! Run statistics printing
//!
//! Printed to stdout once the tables have been written.

use crate::output::csv_tables::ExportReport;
use crate::output::summary::CrawlSummary;

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The crawl summary to display
/// * `report` - Where the tables were written
pub fn print_statistics(summary: &CrawlSummary, report: &ExportReport) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Routes discovered: {}", summary.routes);
    println!("  Stops discovered: {}", summary.stops);
    println!(
        "  Stop/route associations: {} ({:.2} routes per stop)",
        summary.associations,
        summary.routes_per_stop()
    );
    if summary.unnamed_stops > 0 {
        println!("  Stops without a name: {}", summary.unnamed_stops);
    }
    println!();

    println!("Pages:");
    println!("  Fetched: {}", summary.pages_fetched);
    println!("  Failed: {}", summary.pages_failed);
    if summary.links_beyond_depth > 0 {
        println!("  Not followed (depth): {}", summary.links_beyond_depth);
    }
    println!(
        "  Success Rate: {:.1}% in {:.1}s",
        summary.success_rate(),
        summary.elapsed.as_secs_f64()
    );
    println!();

    if !summary.errors_by_status.is_empty() {
        println!("Error Summary:");
        for (status, count) in &summary.errors_by_status {
            if *status == 0 {
                println!("  transport: {}", count);
            } else {
                println!("  HTTP {}: {}", status, count);
            }
        }
        println!();
    }

    println!("Output:");
    println!("  {}", report.routes_path.display());
    println!("  {}", report.stops_path.display());
    if let Some(errors_path) = &report.errors_path {
        println!("  {}", errors_path.display());
    }
}
