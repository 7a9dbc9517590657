//! Integration tests for finish-times
//!
//! These tests use wiremock to stand in for the results listing and drive the
//! scrape pipeline end-to-end against a temporary page cache.

mod common;
mod report_tests;
mod scrape_tests;
