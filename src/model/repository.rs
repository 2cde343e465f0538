//! Lazily populated, never evicted cache of loaded model blobs.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::error::Result;

use super::source::{AssetSource, ModelBlob};

/// Resolves model names to immutable blobs, loading each name at most once.
///
/// Share one repository by `Arc` between every component that needs models;
/// blobs handed out are cheap clones of the cached entry.
pub struct ModelRepository {
    source: Box<dyn AssetSource>,
    cache: RwLock<HashMap<String, ModelBlob>>,
}

impl ModelRepository {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached blob for `name`, loading and caching it on a miss.
    ///
    /// Failures are not cached and not retried; the next call tries again.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ModelNotFound`] if the asset store has no such
    /// artifact and [`crate::Error::ModelRead`] on I/O failure.
    pub fn load(&self, name: &str) -> Result<ModelBlob> {
        if let Some(blob) = self.lookup(name) {
            tracing::debug!("Model cache hit: {name}");
            return Ok(blob);
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have populated the entry while we waited.
        if let Some(blob) = cache.get(name) {
            return Ok(blob.clone());
        }

        tracing::info!("Loading model {name}...");
        let blob = self.source.open(name)?;
        tracing::info!("Loaded model {name} ({} bytes)", blob.len());

        cache.insert(name.to_string(), blob.clone());
        Ok(blob)
    }

    /// Whether `name` is already loaded.
    #[must_use]
    pub fn is_cached(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Names of every loaded model, sorted.
    #[must_use]
    pub fn cached_names(&self) -> Vec<String> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = cache.keys().cloned().collect();
        names.sort();
        names
    }

    fn lookup(&self, name: &str) -> Option<ModelBlob> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl fmt::Debug for ModelRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRepository")
            .field("cached", &self.cached_names())
            .finish_non_exhaustive()
    }
}
