#![deny(unsafe_code)]

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use lc_format::FormatCache;
use tracing::info;

use crate::error::StandardsError;
use crate::registry::{SchemaRegistry, VerifySummary};

/// Shared, reloadable access to the current [`SchemaRegistry`].
///
/// Readers take a snapshot and keep using it for the whole request; a reload
/// builds a complete new registry first and only then swaps it in, so a
/// failed reload leaves the previous registry in place.
#[derive(Debug)]
pub struct RegistryHandle {
    current: RwLock<Arc<SchemaRegistry>>,
    cache: Arc<FormatCache>,
}

impl RegistryHandle {
    pub fn new(registry: SchemaRegistry, cache: Arc<FormatCache>) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
            cache,
        }
    }

    /// Load `standards_dir` into a fresh handle with its own format cache.
    pub fn load(standards_dir: &Path) -> Result<(Self, VerifySummary), StandardsError> {
        let cache = Arc::new(FormatCache::new());
        let (registry, summary) = SchemaRegistry::verify_and_load(standards_dir, &cache)?;
        Ok((Self::new(registry, cache), summary))
    }

    pub fn snapshot(&self) -> Arc<SchemaRegistry> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn cache(&self) -> &Arc<FormatCache> {
        &self.cache
    }

    /// Replace the registry with one loaded from `standards_dir`.
    pub fn reload(&self, standards_dir: &Path) -> Result<VerifySummary, StandardsError> {
        let (registry, summary) = SchemaRegistry::verify_and_load(standards_dir, &self.cache)?;
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(registry);
        info!(dir = %standards_dir.display(), "standards reloaded");
        Ok(summary)
    }
}
