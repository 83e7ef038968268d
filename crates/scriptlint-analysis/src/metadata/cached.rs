//! Lock-guarded segmented LRU in front of a command store.
//!
//! Parallel rules share one store, so the cache sits behind a `Mutex`. The
//! lock is held only for cache operations, never across a backing lookup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use scriptlint_core::cache::SegmentedLruCache;
use scriptlint_core::config::CacheConfig;
use scriptlint_core::errors::{ConfigError, RuleError};

use super::{CommandMetadata, CommandMetadataStore};

/// Hit/miss counters across both lookup kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

pub struct CachedCommandStore<S> {
    inner: S,
    lookups: Mutex<SegmentedLruCache<String, Option<Arc<CommandMetadata>>>>,
    aliases: Mutex<SegmentedLruCache<String, Option<String>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: CommandMetadataStore> CachedCommandStore<S> {
    pub fn new(inner: S, config: &CacheConfig) -> Result<Self, ConfigError> {
        let capacity = config.command_cache_capacity;
        Ok(Self {
            inner,
            lookups: Mutex::new(SegmentedLruCache::try_new(capacity, config.probation_ratio)?),
            aliases: Mutex::new(SegmentedLruCache::try_new(capacity, config.probation_ratio)?),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Cached `lookup` entries.
    pub fn len(&self) -> usize {
        lock(&self.lookups).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.lookups).clear();
        lock(&self.aliases).clear();
    }

    fn record(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn lookup_key(name: &str, platforms: &[String]) -> String {
    let mut platforms: Vec<String> = platforms.iter().map(|p| p.to_ascii_lowercase()).collect();
    platforms.sort();
    platforms.dedup();
    format!("{}|{}", name.to_ascii_lowercase(), platforms.join(","))
}

impl<S: CommandMetadataStore> CommandMetadataStore for CachedCommandStore<S> {
    fn lookup(
        &self,
        name: &str,
        platforms: &[String],
    ) -> Result<Option<Arc<CommandMetadata>>, RuleError> {
        let key = lookup_key(name, platforms);
        if let Some(cached) = lock(&self.lookups).try_get(&key).cloned() {
            self.record(true);
            return Ok(cached);
        }
        self.record(false);
        let resolved = self.inner.lookup(name, platforms)?;
        lock(&self.lookups).set(key, resolved.clone());
        Ok(resolved)
    }

    fn alias_target(&self, name: &str) -> Result<Option<String>, RuleError> {
        let key = name.to_ascii_lowercase();
        if let Some(cached) = lock(&self.aliases).try_get(&key).cloned() {
            self.record(true);
            return Ok(cached);
        }
        self.record(false);
        let resolved = self.inner.alias_target(name)?;
        lock(&self.aliases).set(key, resolved.clone());
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::InMemoryCommandStore;

    struct FailingStore;

    impl CommandMetadataStore for FailingStore {
        fn lookup(
            &self,
            _name: &str,
            _platforms: &[String],
        ) -> Result<Option<Arc<CommandMetadata>>, RuleError> {
            Err(RuleError::Metadata("offline".to_string()))
        }

        fn alias_target(&self, _name: &str) -> Result<Option<String>, RuleError> {
            Err(RuleError::Metadata("offline".to_string()))
        }
    }

    #[test]
    fn test_second_lookup_hits() {
        let store =
            CachedCommandStore::new(InMemoryCommandStore::builtin(), &CacheConfig::default())
                .unwrap();
        assert_eq!(store.alias_target("gci").unwrap().as_deref(), Some("Get-ChildItem"));
        assert_eq!(store.alias_target("GCI").unwrap().as_deref(), Some("Get-ChildItem"));
        assert!(store.lookup("nope", &[]).unwrap().is_none());
        assert!(store.lookup("NOPE", &[]).unwrap().is_none());
        assert_eq!(store.stats(), CacheStats { hits: 2, misses: 2 });
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let store = CachedCommandStore::new(FailingStore, &CacheConfig::default()).unwrap();
        assert!(store.alias_target("gci").is_err());
        assert!(store.alias_target("gci").is_err());
        assert_eq!(store.stats().hits, 0);
    }

    #[test]
    fn test_invalid_capacity() {
        let config = CacheConfig {
            command_cache_capacity: 0,
            ..Default::default()
        };
        assert!(CachedCommandStore::new(InMemoryCommandStore::new(), &config).is_err());
    }
}
