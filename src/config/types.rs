use crate::category::{cross_product, CategoryKey, Sex};
use serde::Deserialize;

/// Main configuration structure for finish-times
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// All categories to scrape, in year, sex, distance order
    pub fn categories(&self) -> Vec<CategoryKey> {
        cross_product(&self.scrape.years, &self.scrape.sexes, &self.scrape.distances)
    }
}

/// Which result listings to pull and how wide to fan out
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub years: Vec<u16>,
    pub sexes: Vec<Sex>,
    /// Race distances in kilometres
    pub distances: Vec<u8>,
    /// Size of the worker pool used for fetching and parsing
    pub workers: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            years: vec![2018, 2019],
            sexes: vec![Sex::Men, Sex::Women],
            distances: vec![6, 10, 21],
            workers: 8,
        }
    }
}

/// Results endpoint and HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Results listing endpoint; any query part is replaced
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Country filter code sent with every search
    pub country: u32,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout; unset waits indefinitely
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "https://minskhalfmarathon.by/results/".to_string(),
            country: 30,
            user_agent: format!("finish-times/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: None,
        }
    }
}

/// On-disk page cache location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub directory: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: "html_cache".to_string(),
        }
    }
}

/// How finish times are binned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    /// Nearest bin; exact ties go to the even bin index
    #[default]
    Nearest,
    /// Start of the bin containing the time
    Floor,
}

/// Histogram and chart output settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    #[serde(rename = "bin-width-secs")]
    pub bin_width_secs: u32,

    pub rounding: Rounding,

    /// Where the SVG chart is written
    #[serde(rename = "chart-path")]
    pub chart_path: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            bin_width_secs: 120,
            rounding: Rounding::Nearest,
            chart_path: "finish_times.svg".to_string(),
        }
    }
}
