//! Flat-file page cache
//!
//! One file per (category, page), holding the decoded page text. Entries never
//! expire; [`PageCache::clear`] is the only way to drop them.

use crate::{FinishTimesError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory of cached results pages
#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the page stored under `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("index.{}.html", key))
    }

    /// Reads a cached page
    ///
    /// # Returns
    ///
    /// * `Ok(Some(String))` - The cached text
    /// * `Ok(None)` - Nothing cached under this key
    /// * `Err(FinishTimesError::Filesystem)` - The file exists but could not be read
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FinishTimesError::Filesystem { path, source }),
        }
    }

    /// Stores page text under `key`, creating the cache directory if needed
    pub async fn put(&self, key: &str, content: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| FinishTimesError::Filesystem {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.path_for(key);
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| FinishTimesError::Filesystem {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }

    /// Removes every cached page
    ///
    /// Returns the number of files removed. A missing cache directory counts
    /// as already empty.
    pub async fn clear(&self) -> Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(FinishTimesError::Filesystem {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| FinishTimesError::Filesystem {
                path: self.dir.clone(),
                source,
            })?
        {
            let path = entry.path();
            if !is_cache_file(&path) {
                continue;
            }
            tokio::fs::remove_file(&path)
                .await
                .map_err(|source| FinishTimesError::Filesystem {
                    path: path.clone(),
                    source,
                })?;
            removed += 1;
        }

        tracing::debug!("Removed {} cached pages from {}", removed, self.dir.display());
        Ok(removed)
    }
}

/// Only `index.*.html` files belong to the cache
fn is_cache_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with("index.") && name.ends_with(".html"))
        .unwrap_or(false)
}
