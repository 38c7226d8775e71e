//! Transit-Mapper main entry point
//!
//! This is the command-line interface for the Transit-Mapper route crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use transit_mapper::config::{load_config_with_hash, validate, Config};
use transit_mapper::crawler::run_crawl;
use transit_mapper::output::{export_tables, print_statistics, CrawlSummary};

/// Transit-Mapper: bus route and stop discovery
///
/// Transit-Mapper crawls a transit agency's route listing, visits every
/// route page it links to, and writes the discovered routes and stops as
/// CSV tables.
#[derive(Parser, Debug)]
#[command(name = "transit-mapper")]
#[command(version)]
#[command(about = "Discovers bus routes and stops from a route-listing site", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Route-listing page to start from (overrides the config file)
    #[arg(long, value_name = "URL")]
    root_url: Option<String>,

    /// Directory to write the tables into (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(ExitCode::SUCCESS);
    }

    handle_crawl(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("transit_mapper=info,warn"),
            1 => EnvFilter::new("transit_mapper=debug,info"),
            2 => EnvFilter::new("transit_mapper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies CLI overrides and validates the result
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(root_url) = &cli.root_url {
        config.crawler.root_url = root_url.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output.directory = output_dir.display().to_string();
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Transit-Mapper Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Root URL: {}", config.crawler.root_url);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    println!("\n✓ Configuration is valid");
}

/// Runs the crawl, writes the tables and maps the outcome to an exit code
///
/// Output failures are returned as errors and abort the process. Fetch
/// failures only change the exit code, and only when the errors table was
/// written.
async fn handle_crawl(config: Config, quiet: bool) -> anyhow::Result<ExitCode> {
    let outcome = run_crawl(&config).await.context("crawl could not start")?;

    let report = export_tables(
        &outcome.snapshot,
        &outcome.errors,
        Path::new(&config.output.directory),
    )
    .context("failed to write output tables")?;

    if !quiet {
        print_statistics(&CrawlSummary::from_outcome(&outcome), &report);
    }

    if report.failed() {
        tracing::error!(
            "Crawl finished with {} fetch errors",
            outcome.errors.len()
        );
        Ok(ExitCode::FAILURE)
    } else {
        tracing::info!("Crawl completed successfully");
        Ok(ExitCode::SUCCESS)
    }
}
