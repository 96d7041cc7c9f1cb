//! Process-wide dataset cache
//!
//! Loading and cleaning the workbook is the only expensive step, so the
//! interactive dashboard keeps the last good [`Dataset`] keyed by the file's
//! canonical path and modification time. Editing the workbook changes the
//! key and triggers a reload; [`DatasetCache::invalidate`] forces one.

use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::core::clean::CleanRules;
use crate::core::workbook::{Dataset, LoadError};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl CacheKey {
    fn for_path(path: &Path) -> Result<Self, LoadError> {
        let meta = std::fs::metadata(path).map_err(|e| LoadError::from_io(path, e))?;
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Ok(Self {
            path: canonical,
            modified: meta.modified().ok(),
        })
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub loads: usize,
}

/// Holds at most one loaded dataset
#[derive(Debug)]
pub struct DatasetCache {
    rules: CleanRules,
    entry: Option<(CacheKey, Arc<Dataset>)>,
    stats: CacheStats,
}

impl DatasetCache {
    pub fn new(rules: CleanRules) -> Self {
        Self {
            rules,
            entry: None,
            stats: CacheStats::default(),
        }
    }

    /// Return the cached dataset for `path`, loading it if stale or absent
    ///
    /// Failed loads are returned to the caller and leave the cache as it was.
    pub fn get(&mut self, path: &Path) -> Result<Arc<Dataset>, LoadError> {
        let key = CacheKey::for_path(path)?;

        if let Some((cached_key, dataset)) = &self.entry {
            if *cached_key == key {
                debug!("dataset cache hit for {}", path.display());
                self.stats.hits += 1;
                return Ok(Arc::clone(dataset));
            }
        }

        debug!("dataset cache miss for {}", path.display());
        let dataset = Arc::new(Dataset::load(path, &self.rules)?);
        self.stats.loads += 1;
        self.entry = Some((key, Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Drop the cached dataset so the next `get` reloads from disk
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("dataset cache invalidated");
        }
    }

    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
