//! Search link construction for the results listing
//!
//! The endpoint takes its filters as query parameters; array filters use the
//! `name[0]` form and the listing only applies filters when the submit marker
//! is present.

use crate::category::{CategoryKey, PageRef};
use crate::config::HttpConfig;
use crate::ConfigError;
use url::Url;

/// Label of the listing's submit button ("Show"), sent as the filter marker
const SUBMIT_LABEL: &str = "Показать";

/// Query parameter carrying the page number
pub const PAGE_PARAM: &str = "PAGEN_1";

/// The results listing endpoint with its fixed filters
#[derive(Debug, Clone)]
pub struct SearchEndpoint {
    base: Url,
    country: u32,
}

impl SearchEndpoint {
    /// Creates an endpoint from a base URL; any existing query is dropped
    pub fn new(mut base: Url, country: u32) -> Self {
        base.set_query(None);
        base.set_fragment(None);
        Self { base, country }
    }

    /// Creates an endpoint from the HTTP section of the configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;
        Ok(Self::new(base, config.country))
    }

    /// Builds the search URL for one category page
    ///
    /// Without a page number the listing serves page 1.
    ///
    /// # Example
    ///
    /// ```
    /// use finish_times::category::{CategoryKey, Sex};
    /// use finish_times::crawler::SearchEndpoint;
    /// use url::Url;
    ///
    /// let endpoint = SearchEndpoint::new(Url::parse("https://example.com/results/").unwrap(), 30);
    /// let link = endpoint.search_link(&CategoryKey::new(2019, 10, Sex::Men), Some(2));
    /// assert!(link.as_str().ends_with("&PAGEN_1=2"));
    /// ```
    pub fn search_link(&self, category: &CategoryKey, page: Option<u32>) -> Url {
        let mut url = self.base.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("year", &category.year.to_string())
                .append_pair("last_name", "")
                .append_pair("distance[0]", &category.distance.to_string())
                .append_pair("number_from", "")
                .append_pair("number_to", "")
                .append_pair("sex[0]", category.sex.code())
                .append_pair("country", &self.country.to_string())
                .append_pair("set_filter", SUBMIT_LABEL);

            if let Some(page) = page {
                query.append_pair(PAGE_PARAM, &page.to_string());
            }
        }
        url
    }

    /// Builds the page references for pages `1..=last_page` of a category
    pub fn page_refs(&self, category: &CategoryKey, last_page: u32) -> Vec<PageRef> {
        (1..=last_page)
            .map(|page| PageRef {
                category: *category,
                page,
                url: self.search_link(category, Some(page)),
            })
            .collect()
    }
}
