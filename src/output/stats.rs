//! Per-category finish-time statistics
//!
//! This module turns raw time strings into per-category summaries and prints
//! the human-readable report.

use crate::category::CategoryKey;
use crate::config::{ReportConfig, Rounding};
use crate::crawler::CategoryTimes;
use crate::output::histogram::{bucket_counts, mean_time, parse_finish_time, Bucket, FinishTime};
use crate::FinishTimesError;

/// Finish-time summary of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: CategoryKey,

    /// Number of finishers with a recorded time
    pub finishers: usize,

    /// Mean finishing time, `None` for a category without finishers
    pub mean: Option<FinishTime>,

    /// Dense histogram ordered by bin
    pub buckets: Vec<Bucket>,
}

impl CategorySummary {
    /// Counts keyed by bucket label, in bin order
    pub fn bucket_labels(&self) -> Vec<(String, usize)> {
        self.buckets.iter().map(|b| (b.label(), b.count)).collect()
    }
}

/// Builds the summary of every category
///
/// # Arguments
///
/// * `times` - Raw time strings per category
/// * `bin_secs` - Histogram bin width in seconds
/// * `rounding` - How times are assigned to bins
///
/// # Returns
///
/// * `Ok(Vec<CategorySummary>)` - One summary per category, in category order
/// * `Err(FinishTimesError::Parse)` - A time string was not a valid finish time
pub fn summarize(
    times: &CategoryTimes,
    bin_secs: u32,
    rounding: Rounding,
) -> Result<Vec<CategorySummary>, FinishTimesError> {
    times
        .iter()
        .map(|(category, raw_times)| {
            let parsed = raw_times
                .iter()
                .map(|raw| parse_finish_time(raw))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| FinishTimesError::Parse {
                    key: category.to_string(),
                    source,
                })?;

            Ok(CategorySummary {
                category: *category,
                finishers: parsed.len(),
                mean: mean_time(&parsed),
                buckets: bucket_counts(&parsed, bin_secs, rounding),
            })
        })
        .collect()
}

/// Builds summaries using the report section of the configuration
pub fn summarize_with(
    times: &CategoryTimes,
    report: &ReportConfig,
) -> Result<Vec<CategorySummary>, FinishTimesError> {
    summarize(times, report.bin_width_secs, report.rounding)
}

/// Formats the mean-time line of one category
pub fn format_mean_line(summary: &CategorySummary) -> String {
    let mean = summary
        .mean
        .map(|m| m.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "Mean time for {} ({} total): {}",
        summary.category, summary.finishers, mean
    )
}

/// Prints the per-category mean times to stdout
pub fn print_report(summaries: &[CategorySummary]) {
    for summary in summaries {
        println!("{}", format_mean_line(summary));
    }
}
