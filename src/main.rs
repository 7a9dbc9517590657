//! finish-times main entry point
//!
//! This is the command-line interface for the finish-time scraper.

use anyhow::Context;
use clap::Parser;
use finish_times::config::{load_or_default, Config};
use finish_times::crawler::{run_scrape, SearchEndpoint};
use finish_times::output;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// finish-times: Minsk Half Marathon finish-time histograms
///
/// Scrapes the paginated results listing for every configured year, distance
/// and sex, caches each page on disk, and charts how finishing times are
/// distributed per category.
#[derive(Parser, Debug)]
#[command(name = "finish-times")]
#[command(version)]
#[command(about = "Race result scraper and finish-time histogram", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Clear the page cache before scraping
    #[arg(long)]
    refresh: bool,

    /// Show configuration and first-page links without fetching anything
    #[arg(long, conflicts_with = "refresh")]
    dry_run: bool,

    /// Write the chart here instead of the configured chart path
    #[arg(long, value_name = "PATH")]
    chart: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_or_default(Some(path.as_path()))
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            load_or_default(None).context("Invalid built-in configuration")?
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        let chart_path = cli
            .chart
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.report.chart_path));
        handle_scrape(&config, cli.refresh, chart_path).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("finish_times=info,warn"),
            1 => EnvFilter::new("finish_times=debug,info"),
            2 => EnvFilter::new("finish_times=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be scraped
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let endpoint = SearchEndpoint::from_config(&config.http)?;
    let categories = config.categories();

    println!("=== finish-times Dry Run ===\n");

    println!("Scrape:");
    println!("  Workers: {}", config.scrape.workers);
    println!("  Cache directory: {}", config.cache.directory);
    println!("  User agent: {}", config.http.user_agent);

    println!("\nReport:");
    println!("  Bin width: {}s", config.report.bin_width_secs);
    println!("  Rounding: {:?}", config.report.rounding);
    println!("  Chart: {}", config.report.chart_path);

    println!("\nCategories ({}):", categories.len());
    for category in &categories {
        println!("  - {}", category);
        println!("    {}", endpoint.search_link(category, None));
    }

    Ok(())
}

/// Handles the main scrape, report and chart
async fn handle_scrape(config: &Config, refresh: bool, chart_path: PathBuf) -> anyhow::Result<()> {
    if refresh {
        tracing::info!("Refreshing: cached pages will be refetched");
    }

    let times = match run_scrape(config, refresh).await {
        Ok(times) => times,
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            return Err(e.into());
        }
    };

    output::report(&times, &config.report, &chart_path)
        .with_context(|| format!("Failed to report {} categories", times.len()))?;

    Ok(())
}
