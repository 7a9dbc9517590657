//! Output module for finish-time reports
//!
//! This module handles:
//! - Parsing raw time strings and binning them into histograms
//! - Per-category mean times printed to stdout
//! - The SVG chart of all categories

pub mod chart;
pub mod histogram;
pub mod stats;

pub use chart::{render_chart, ChartOptions};
pub use histogram::{
    bucket_counts, format_hms, mean_time, parse_finish_time, round_to_bin, Bucket, FinishTime,
};
pub use stats::{format_mean_line, print_report, summarize, summarize_with, CategorySummary};

use crate::config::ReportConfig;
use crate::crawler::CategoryTimes;
use crate::FinishTimesError;
use std::path::Path;

/// Summarizes scraped times, prints the report and writes the chart
///
/// # Arguments
///
/// * `times` - Raw time strings per category
/// * `settings` - Binning and chart settings
/// * `chart_path` - Where to write the SVG chart
///
/// # Returns
///
/// * `Ok(Vec<CategorySummary>)` - The summaries that were reported and drawn
/// * `Err(FinishTimesError)` - A time failed to parse or the chart failed
pub fn report(
    times: &CategoryTimes,
    settings: &ReportConfig,
    chart_path: &Path,
) -> Result<Vec<CategorySummary>, FinishTimesError> {
    let summaries = summarize_with(times, settings)?;
    print_report(&summaries);

    render_chart(
        &summaries,
        &ChartOptions::new(chart_path, settings.bin_width_secs),
    )?;
    tracing::info!("Chart written to {}", chart_path.display());

    Ok(summaries)
}
