use crate::config::types::{CacheConfig, Config, HttpConfig, ReportConfig, ScrapeConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

const SECONDS_PER_DAY: u32 = 86_400;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_scrape_config(&config.scrape)?;
    validate_http_config(&config.http)?;
    validate_cache_config(&config.cache)?;
    validate_report_config(&config.report)?;
    Ok(())
}

/// Validates the category lists and pool size
fn validate_scrape_config(config: &ScrapeConfig) -> ConfigResult<()> {
    if config.years.is_empty() || config.sexes.is_empty() || config.distances.is_empty() {
        return Err(ConfigError::Validation(
            "years, sexes and distances must each list at least one value".to_string(),
        ));
    }

    if let Some(year) = config.years.iter().find(|y| !(2000..=2100).contains(*y)) {
        return Err(ConfigError::Validation(format!(
            "year must be between 2000 and 2100, got {}",
            year
        )));
    }

    if config.distances.contains(&0) {
        return Err(ConfigError::Validation(
            "distances must be greater than 0".to_string(),
        ));
    }

    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    Ok(())
}

/// Validates endpoint and client settings
fn validate_http_config(config: &HttpConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> ConfigResult<()> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "cache directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates bin width and chart output
fn validate_report_config(config: &ReportConfig) -> ConfigResult<()> {
    let width = config.bin_width_secs;
    if width == 0 || width > 3600 {
        return Err(ConfigError::Validation(format!(
            "bin-width-secs must be between 1 and 3600, got {}",
            width
        )));
    }

    // Bins must tile a day so every bucket starts on a whole multiple.
    if SECONDS_PER_DAY % width != 0 {
        return Err(ConfigError::Validation(format!(
            "bin-width-secs must divide 86400, got {}",
            width
        )));
    }

    if config.chart_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "chart-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
