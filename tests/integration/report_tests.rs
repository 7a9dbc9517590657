use crate::common::{mount_first_page, mount_page, results_page, test_config};
use finish_times::category::{CategoryKey, Sex};
use finish_times::config::{ReportConfig, Rounding};
use finish_times::crawler::{run_scrape, CategoryTimes};
use finish_times::output::{self, format_mean_line, summarize};
use finish_times::FinishTimesError;
use tempfile::TempDir;
use wiremock::MockServer;

fn two_categories() -> CategoryTimes {
    let mut times = CategoryTimes::new();
    times.insert(
        CategoryKey::new(2019, 10, Sex::Men),
        vec!["0:55:10".to_string(), "0:56:40".to_string()],
    );
    times.insert(
        CategoryKey::new(2019, 10, Sex::Women),
        vec!["1:05:00".to_string()],
    );
    times
}

fn labels(summary: &output::CategorySummary) -> Vec<(String, usize)> {
    summary.bucket_labels()
}

fn expected(buckets: &[(&str, usize)]) -> Vec<(String, usize)> {
    buckets
        .iter()
        .map(|&(label, count)| (label.to_string(), count))
        .collect()
}

#[test]
fn test_floor_rounding_histogram() {
    let summaries = summarize(&two_categories(), 120, Rounding::Floor).unwrap();

    assert_eq!(labels(&summaries[0]), expected(&[("0:54:00", 1), ("0:56:00", 1)]));
    assert_eq!(labels(&summaries[1]), expected(&[("1:04:00", 1)]));
}

#[test]
fn test_nearest_rounding_histogram() {
    let summaries = summarize(&two_categories(), 120, Rounding::Nearest).unwrap();

    assert_eq!(labels(&summaries[0]), expected(&[("0:56:00", 2)]));
    assert_eq!(labels(&summaries[1]), expected(&[("1:04:00", 1)]));
}

#[test]
fn test_mean_lines() {
    let summaries = summarize(&two_categories(), 120, Rounding::Nearest).unwrap();
    let lines: Vec<String> = summaries.iter().map(format_mean_line).collect();

    assert_eq!(
        lines,
        vec![
            "Mean time for 2019-10-M (2 total): 0:55:55",
            "Mean time for 2019-10-W (1 total): 1:05:00",
        ]
    );
}

#[test]
fn test_dense_buckets_fill_gaps() {
    let mut times = CategoryTimes::new();
    times.insert(
        CategoryKey::new(2018, 21, Sex::Women),
        vec!["1:30:00".to_string(), "1:36:00".to_string()],
    );

    let summaries = summarize(&times, 120, Rounding::Floor).unwrap();
    assert_eq!(
        labels(&summaries[0]),
        expected(&[
            ("1:30:00", 1),
            ("1:32:00", 0),
            ("1:34:00", 0),
            ("1:36:00", 1),
        ])
    );
}

#[test]
fn test_report_writes_chart() {
    let dir = TempDir::new().unwrap();
    let chart_path = dir.path().join("out").join("chart.svg");
    let settings = ReportConfig {
        chart_path: chart_path.display().to_string(),
        ..ReportConfig::default()
    };

    let summaries = output::report(&two_categories(), &settings, &chart_path).unwrap();

    assert_eq!(summaries.len(), 2);
    let svg = std::fs::read_to_string(&chart_path).unwrap();
    assert!(svg.contains("2019-10-M"));
    assert!(svg.contains("2019-10-W"));
}

#[test]
fn test_report_rejects_bad_time() {
    let dir = TempDir::new().unwrap();
    let chart_path = dir.path().join("chart.svg");
    let mut times = two_categories();
    times.insert(
        CategoryKey::new(2019, 21, Sex::Men),
        vec!["DNS".to_string()],
    );

    let result = output::report(&times, &ReportConfig::default(), &chart_path);

    assert!(matches!(result, Err(FinishTimesError::Parse { .. })));
    assert!(!chart_path.exists());
}

#[tokio::test]
async fn test_scrape_then_report() {
    let mock_server = MockServer::start().await;
    let cache_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();

    mount_page(&mock_server, "M", 2, results_page(&["56:40"], Some(2))).await;
    mount_first_page(&mock_server, "M", results_page(&["0:55:10"], Some(2))).await;
    mount_first_page(&mock_server, "W", results_page(&["1:05:00"], Some(1))).await;

    let config = test_config(
        &mock_server.uri(),
        cache_dir.path(),
        vec![Sex::Men, Sex::Women],
    );
    let times = run_scrape(&config, false).await.unwrap();

    let chart_path = out_dir.path().join("finish_times.svg");
    let summaries = output::report(&times, &config.report, &chart_path).unwrap();

    assert_eq!(summaries[0].finishers, 2);
    assert_eq!(
        format_mean_line(&summaries[0]),
        "Mean time for 2019-10-M (2 total): 0:55:55"
    );
    assert_eq!(labels(&summaries[0]), expected(&[("0:56:00", 2)]));
    assert!(chart_path.exists());
}
