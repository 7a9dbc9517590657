//! Result categories and page references
//!
//! A category is one (year, distance, sex) combination of the results listing.
//! Its display form doubles as the cache partition and report label.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Sex filter understood by the results endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Men,
    #[serde(rename = "W")]
    Women,
}

impl Sex {
    /// Returns the letter used in query strings and category labels
    pub fn code(&self) -> &'static str {
        match self {
            Self::Men => "M",
            Self::Women => "W",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Self::Men),
            "W" => Ok(Self::Women),
            other => Err(format!("unknown sex code '{}'", other)),
        }
    }
}

/// One (year, distance, sex) combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryKey {
    pub year: u16,
    /// Race distance in kilometres
    pub distance: u8,
    pub sex: Sex,
}

impl CategoryKey {
    pub fn new(year: u16, distance: u8, sex: Sex) -> Self {
        Self {
            year,
            distance,
            sex,
        }
    }

    /// Cache key of one page of this category, e.g. `2019-10-M-3`
    pub fn cache_key(&self, page: u32) -> String {
        format!("{}-{}", self, page)
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.distance, self.sex)
    }
}

/// A single results page of a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub category: CategoryKey,
    /// 1-based page number
    pub page: u32,
    pub url: Url,
}

impl PageRef {
    pub fn cache_key(&self) -> String {
        self.category.cache_key(self.page)
    }
}

/// Builds the category cross product in year, sex, distance order
pub fn cross_product(years: &[u16], sexes: &[Sex], distances: &[u8]) -> Vec<CategoryKey> {
    let mut categories = Vec::with_capacity(years.len() * sexes.len() * distances.len());
    for &year in years {
        for &sex in sexes {
            for &distance in distances {
                categories.push(CategoryKey::new(year, distance, sex));
            }
        }
    }
    categories
}

/// Per-category values kept in insertion order
///
/// Categories come out in the order they were scraped, so reports and chart
/// legends follow the configured year, sex, distance order rather than the
/// sort order of `CategoryKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap<V> {
    entries: Vec<(CategoryKey, V)>,
}

impl<V> CategoryMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a category, or replaces its value in place if already present
    pub fn insert(&mut self, category: CategoryKey, value: V) -> Option<V> {
        match self.entries.iter_mut().find(|(key, _)| *key == category) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((category, value));
                None
            }
        }
    }

    pub fn get(&self, category: &CategoryKey) -> Option<&V> {
        self.entries
            .iter()
            .find(|(key, _)| key == category)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &CategoryKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryKey, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for CategoryMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::ops::Index<&CategoryKey> for CategoryMap<V> {
    type Output = V;

    fn index(&self, category: &CategoryKey) -> &V {
        match self.get(category) {
            Some(value) => value,
            None => panic!("no entry for category {}", category),
        }
    }
}

impl<V> IntoIterator for CategoryMap<V> {
    type Item = (CategoryKey, V);
    type IntoIter = std::vec::IntoIter<(CategoryKey, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
