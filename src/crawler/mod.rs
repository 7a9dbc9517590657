//! Crawler module for results page fetching and processing
//!
//! This module contains the scraping pipeline, including:
//! - Search link construction for the results listing
//! - Cache-first HTTP fetching with charset decoding
//! - Pagination discovery and finishing-time extraction
//! - A bounded worker pool and the batch coordinator

mod cache;
mod coordinator;
mod fetcher;
mod link;
mod parser;
mod pool;

pub use cache::PageCache;
pub use coordinator::{run_scrape, CategoryPages, CategoryTimes, Coordinator};
pub use fetcher::{build_http_client, charset_from_content_type, decode_body, PageFetcher};
pub use link::{SearchEndpoint, PAGE_PARAM};
pub use parser::{discover_page_count, extract_times, normalize_time, END_LINK_LABEL, TIME_COLUMN};
pub use pool::WorkerPool;
