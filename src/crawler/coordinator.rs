//! Scrape coordinator - batch orchestration logic
//!
//! This module drives the scrape across all configured categories:
//! - Fetching page 1 of a category and reading its page count
//! - Fetching every page of the category through the worker pool
//! - Extracting finishing times from every page through the worker pool
//!
//! Categories are handled one after another. Within a category the page
//! count is always known before any page beyond the first is requested.

use crate::category::{CategoryKey, CategoryMap};
use crate::config::Config;
use crate::crawler::cache::PageCache;
use crate::crawler::fetcher::{build_http_client, PageFetcher};
use crate::crawler::link::SearchEndpoint;
use crate::crawler::parser::{discover_page_count, extract_times};
use crate::crawler::pool::WorkerPool;
use crate::{FinishTimesError, Result};
use std::sync::Arc;

/// Raw page texts per category, in scrape order then page order
pub type CategoryPages = CategoryMap<Vec<String>>;

/// Raw finishing-time strings per category, in scrape order then page and row order
pub type CategoryTimes = CategoryMap<Vec<String>>;

/// Main scrape coordinator structure
pub struct Coordinator {
    endpoint: SearchEndpoint,
    fetcher: Arc<PageFetcher>,
    pool: WorkerPool,
    categories: Vec<CategoryKey>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The scrape configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(FinishTimesError)` - Invalid endpoint or HTTP client setup failed
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = SearchEndpoint::from_config(&config.http)?;
        let client = build_http_client(&config.http)?;
        let cache = PageCache::new(&config.cache.directory);

        Ok(Self {
            endpoint,
            fetcher: Arc::new(PageFetcher::new(client, cache)),
            pool: WorkerPool::new(config.scrape.workers),
            categories: config.categories(),
        })
    }

    /// Configured categories, in scrape order
    pub fn categories(&self) -> &[CategoryKey] {
        &self.categories
    }

    pub fn cache(&self) -> &PageCache {
        self.fetcher.cache()
    }

    /// Drops every cached page so the next load refetches everything
    pub async fn refresh_cache(&self) -> Result<usize> {
        let removed = self.cache().clear().await?;
        tracing::info!(
            "Cleared {} cached pages from {}",
            removed,
            self.cache().dir().display()
        );
        Ok(removed)
    }

    /// Fetches every results page of one category
    ///
    /// 1. Fetch page 1 (cache key `{category}-1`)
    /// 2. Read the page count `N` from it
    /// 3. Fetch pages `1..=N` through the pool; page 1 is served from cache
    pub async fn load_category(
        &self,
        category: &CategoryKey,
    ) -> Result<Vec<String>> {
        let first_key = category.cache_key(1);
        let first_url = self.endpoint.search_link(category, None);
        let first_page = self.fetcher.fetch(&first_key, &first_url).await?;

        let last_page =
            discover_page_count(&first_page).map_err(|source| FinishTimesError::Parse {
                key: first_key.clone(),
                source,
            })?;
        tracing::debug!("{} has {} pages", category, last_page);

        let page_refs = self.endpoint.page_refs(category, last_page);
        let fetcher = self.fetcher.clone();
        self.pool
            .map(page_refs, |page_ref| {
                let fetcher = fetcher.clone();
                async move { fetcher.fetch(&page_ref.cache_key(), &page_ref.url).await }
            })
            .await
    }

    /// Fetches every page of every given category, one category at a time
    pub async fn load_all(
        &self,
        categories: &[CategoryKey],
    ) -> Result<CategoryPages> {
        let mut pages = CategoryPages::new();
        for category in categories {
            let category_pages = self.load_category(category).await?;
            tracing::debug!("Loaded {} pages for {}", category_pages.len(), category);
            pages.insert(*category, category_pages);
        }
        Ok(pages)
    }

    /// Extracts finishing times from loaded pages
    ///
    /// Pages of a category are parsed concurrently; the per-page results are
    /// concatenated in page order.
    pub async fn parse_all(&self, pages: CategoryPages) -> Result<CategoryTimes> {
        let mut times = CategoryTimes::new();
        for (category, category_pages) in pages {
            let per_page = self
                .pool
                .map_blocking(
                    category_pages.into_iter().enumerate(),
                    move |(index, html)| {
                        extract_times(&html).map_err(|source| FinishTimesError::Parse {
                            key: category.cache_key(index as u32 + 1),
                            source,
                        })
                    },
                )
                .await?;

            let category_times: Vec<String> = per_page.into_iter().flatten().collect();
            tracing::debug!("Extracted {} times for {}", category_times.len(), category);
            times.insert(category, category_times);
        }
        Ok(times)
    }

    /// Loads and parses every configured category
    pub async fn run(&self) -> Result<CategoryTimes> {
        tracing::info!(
            "Scraping {} categories with {} workers",
            self.categories.len(),
            self.pool.size()
        );

        let pages = self.load_all(&self.categories).await?;
        tracing::info!("Load completed at: {}", clock());

        let times = self.parse_all(pages).await?;
        tracing::info!("Parsing completed at: {}", clock());

        Ok(times)
    }
}

/// Local wall-clock time for progress lines
pub(crate) fn clock() -> String {
    chrono::Local::now().format("%H:%M:%S%.6f").to_string()
}

/// Runs the scrape for a configuration
///
/// When `refresh` is set the page cache is cleared first.
///
/// # Example
///
/// ```no_run
/// use finish_times::config::load_config;
/// use finish_times::crawler::run_scrape;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("finish-times.toml"))?;
/// let times = run_scrape(&config, false).await?;
/// println!("{} categories", times.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: &Config, refresh: bool) -> Result<CategoryTimes> {
    let coordinator = Coordinator::new(config)?;
    if refresh {
        coordinator.refresh_cache().await?;
    }
    tracing::info!("Started at: {}", clock());
    coordinator.run().await
}
