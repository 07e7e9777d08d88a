use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use schemadoc_core::{Error, Result, SchemaSnapshot};

use crate::adapter::SchemaProvider;

/// Memoizes snapshots per reference for the lifetime of one build.
///
/// Schema definitions are static within a build, so the first successful load
/// is reused by every later tag. Failures are not cached.
#[derive(Debug)]
pub struct CachedProvider<P> {
    inner: P,
    cache: Mutex<BTreeMap<String, Arc<SchemaSnapshot>>>,
}

impl<P: SchemaProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: Mutex::new(BTreeMap::new()),
        }
    }

    /// Shared snapshot for `reference`, loading it on first use.
    pub fn get(&self, reference: &str) -> Result<Arc<SchemaSnapshot>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| Error::SchemaLoad("snapshot cache poisoned".to_string()))?;

        if let Some(snapshot) = cache.get(reference) {
            tracing::debug!(event = "snapshot_cache_hit", reference = %reference);
            return Ok(Arc::clone(snapshot));
        }

        let snapshot = Arc::new(self.inner.load(reference)?);
        tracing::debug!(
            event = "snapshot_cached",
            provider = self.inner.kind(),
            reference = %reference,
            tables = snapshot.len()
        );
        cache.insert(reference.to_string(), Arc::clone(&snapshot));
        Ok(snapshot)
    }
}

impl<P: SchemaProvider> SchemaProvider for CachedProvider<P> {
    fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    fn load(&self, reference: &str) -> Result<SchemaSnapshot> {
        self.get(reference).map(|snapshot| (*snapshot).clone())
    }
}
