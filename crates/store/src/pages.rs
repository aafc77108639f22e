//! On-disk cache for pre-rendered error pages, looked up by fixed key.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;

/// Stores rendered pages under `{data_dir}/cache/pages/{key}.html`.
pub struct PageCache {
    cache_dir: PathBuf,
}

impl PageCache {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            cache_dir: data_dir.join("cache").join("pages"),
        }
    }

    fn page_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.cache_dir.join(format!("{key}.html")))
    }

    /// Fetch a cached page verbatim. `None` on cache miss.
    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.page_path(key)?;
        if !path.exists() {
            debug!("Page cache miss: {}", key);
            return Ok(None);
        }
        debug!("Page cache hit: {}", key);
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    /// Store a rendered page, replacing any previous rendition.
    pub fn put(&self, key: &str, html: &str) -> Result<(), StoreError> {
        let path = self.page_path(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, html)?;
        Ok(())
    }
}
