//! Finish-time distribution chart
//!
//! Draws one marked line per category on a shared time axis and writes the
//! result as SVG.

use crate::output::histogram::format_hms;
use crate::output::stats::CategorySummary;
use crate::FinishTimesError;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::path::{Path, PathBuf};

/// Chart output settings
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub path: PathBuf,
    /// Histogram bin width in seconds
    pub bin_secs: u32,
    /// Width and height in pixels
    pub size: (u32, u32),
}

impl ChartOptions {
    pub fn new(path: impl Into<PathBuf>, bin_secs: u32) -> Self {
        Self {
            path: path.into(),
            bin_secs: bin_secs.max(1),
            size: (1280, 720),
        }
    }
}

/// Shared axis extent over all categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisBounds {
    /// First bin start in seconds
    first: u32,
    /// Number of bins from `first` to the last occupied bin
    bins: u32,
    max_count: u32,
}

fn axis_bounds(summaries: &[CategorySummary], bin_secs: u32) -> Option<AxisBounds> {
    let buckets = || summaries.iter().flat_map(|s| s.buckets.iter());

    let first = buckets().map(|b| b.start).min()?;
    let last = buckets().map(|b| b.start).max()?;
    let max_count = buckets().map(|b| b.count as u32).max()?;

    Some(AxisBounds {
        first,
        bins: (last - first) / bin_secs + 1,
        max_count,
    })
}

fn chart_error(e: impl std::fmt::Display) -> FinishTimesError {
    FinishTimesError::Chart(e.to_string())
}

/// Renders the finish-time histogram of every category to an SVG file
///
/// The x axis is the bin index on the shared time axis, labelled `H:MM:SS`;
/// the y axis is the number of finishers in that bin.
pub fn render_chart(
    summaries: &[CategorySummary],
    options: &ChartOptions,
) -> Result<(), FinishTimesError> {
    let bin = options.bin_secs;
    let bounds = axis_bounds(summaries, bin)
        .ok_or_else(|| FinishTimesError::Chart("no finish times to plot".to_string()))?;

    ensure_parent_dir(&options.path)?;

    let root = SVGBackend::new(&options.path, options.size).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 90)
        .build_cartesian_2d(0u32..bounds.bins, 0u32..(bounds.max_count + 1))
        .map_err(chart_error)?;

    let first = bounds.first;
    chart
        .configure_mesh()
        .x_desc("Time of completion")
        .y_desc("Minsk Half-Marathon")
        .x_labels(bounds.bins.min(48) as usize)
        .x_label_formatter(&|index| format_hms(first + index * bin))
        .x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .draw()
        .map_err(chart_error)?;

    for (idx, summary) in summaries.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points = summary
            .buckets
            .iter()
            .map(|b| ((b.start - first) / bin, b.count as u32));

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)).point_size(4))
            .map_err(chart_error)?
            .label(summary.category.to_string())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<(), FinishTimesError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| FinishTimesError::Filesystem {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
