//! Shared cache of compiled formats.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use lc_model::{CompiledFormat, FormatError};
use tracing::debug;

use crate::grammar::compile;

/// Compiled formats keyed by their specification string.
///
/// Compilation is pure, so two threads racing on the same miss both produce
/// an equal value and either may win the insert.
#[derive(Debug, Default)]
pub struct FormatCache {
    entries: RwLock<HashMap<String, Arc<CompiledFormat>>>,
}

impl FormatCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached format for `spec`, compiling it on first use.
    pub fn get_or_compile(&self, spec: &str) -> Result<Arc<CompiledFormat>, FormatError> {
        if let Some(found) = self.get(spec) {
            return Ok(found);
        }

        let compiled = Arc::new(compile(spec)?);
        debug!(spec, components = compiled.components.len(), "compiled format");

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = entries
            .entry(spec.to_string())
            .or_insert_with(|| Arc::clone(&compiled));
        Ok(Arc::clone(entry))
    }

    pub fn get(&self, spec: &str) -> Option<Arc<CompiledFormat>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(spec)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_once_and_shares() {
        let cache = FormatCache::new();
        let first = cache.get_or_compile("3!a15d").unwrap();
        let second = cache.get_or_compile("3!a15d").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = FormatCache::new();
        assert!(cache.get_or_compile("15q").is_err());
        assert!(cache.is_empty());
    }
}
