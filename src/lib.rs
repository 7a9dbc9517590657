//! Finish-times: race result scraper and finish-time histogram
//!
//! This crate pulls paginated result listings for the Minsk Half Marathon,
//! caches every page on disk, extracts the finishing times and renders the
//! distribution of finish times per category (year, distance, sex).

pub mod category;
pub mod config;
pub mod crawler;
pub mod output;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for finish-times operations
#[derive(Debug, Error)]
pub enum FinishTimesError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request failed for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Cannot decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Parse error in {key}: {source}")]
    Parse { key: String, source: ScrapeError },

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("Chart error: {0}")]
    Chart(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Markup and time-format errors found while scraping a results page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    #[error("Invalid selector '{0}'")]
    Selector(String),

    #[error("Missing element: {0}")]
    MissingElement(&'static str),

    #[error("No '{0}' link in pagination block")]
    MissingEndLink(&'static str),

    #[error("Invalid page number in '{0}'")]
    InvalidPageNumber(String),

    #[error("Row {row} has {cells} cells, expected at least {expected}")]
    MissingTimeCell {
        row: usize,
        cells: usize,
        expected: usize,
    },

    #[error("Invalid finish time '{0}'")]
    InvalidTime(String),
}

/// Result type alias for finish-times operations
pub type Result<T> = std::result::Result<T, FinishTimesError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for scraping operations
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;

// Re-export commonly used types
pub use category::{CategoryKey, CategoryMap, PageRef, Sex};
pub use config::Config;
pub use crawler::Coordinator;
