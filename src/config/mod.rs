//! Configuration module for finish-times
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a file scrapes the 2018-2019
//! results for all distances and both sexes.
//!
//! # Example
//!
//! ```no_run
//! use finish_times::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("finish-times.toml")).unwrap();
//! println!("Scraping {} categories", config.categories().len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, HttpConfig, ReportConfig, Rounding, ScrapeConfig};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
