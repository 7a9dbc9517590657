//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the HTTP client with the configured user agent
//! - Serving pages from the on-disk cache when present
//! - GET requests for cache misses
//! - Decoding bodies with the charset declared in `Content-Type`
//!
//! There is no retry: any failure is returned to the caller.

use crate::config::HttpConfig;
use crate::crawler::cache::PageCache;
use crate::FinishTimesError;
use encoding_rs::Encoding;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP section of the configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Cache-first page fetcher
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    cache: PageCache,
}

impl PageFetcher {
    pub fn new(client: Client, cache: PageCache) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Returns the page stored under `key`, fetching `url` on a cache miss
    ///
    /// # Request Flow
    ///
    /// 1. Cached file present → return it, no request is made
    /// 2. GET `url`; transport errors and non-2xx statuses → `Network`
    /// 3. Decode the body with the `Content-Type` charset → `Decode` on failure
    /// 4. Write the text to the cache → `Filesystem` on failure
    pub async fn fetch(&self, key: &str, url: &Url) -> Result<String, FinishTimesError> {
        if let Some(content) = self.cache.get(key).await? {
            tracing::debug!("Using cached page {}", key);
            return Ok(content);
        }

        tracing::info!("Making request... {}", url);

        let network_error = |source: reqwest::Error| FinishTimesError::Network {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(network_error)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(network_error)?;

        let content = decode_body(content_type.as_deref(), &body).map_err(|reason| {
            FinishTimesError::Decode {
                url: url.to_string(),
                reason,
            }
        })?;

        let path = self.cache.put(key, &content).await?;
        tracing::debug!("Cached {} ({} bytes) at {}", key, content.len(), path.display());

        Ok(content)
    }
}

/// Extracts the `charset` parameter from a `Content-Type` header value
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches('"');
            (!value.is_empty()).then_some(value)
        } else {
            None
        }
    })
}

/// Decodes a response body with the charset declared in `Content-Type`
///
/// Fails when the header or its charset is missing, the charset label is not
/// known, or the bytes are malformed for that charset.
pub fn decode_body(content_type: Option<&str>, body: &[u8]) -> Result<String, String> {
    let content_type = content_type.ok_or_else(|| "missing Content-Type header".to_string())?;

    let label = charset_from_content_type(content_type)
        .ok_or_else(|| format!("no charset in Content-Type '{}'", content_type))?;

    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| format!("unsupported charset '{}'", label))?;

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| format!("body is not valid {}", encoding.name()))
}
