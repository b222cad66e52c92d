//! In-process array cache, the default metadata and query cache

use crate::{CacheBackend, CacheKind, CacheResult, CacheStats};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

/// Entry stored by the in-process backends
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    pub(crate) fn new(data: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            data,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.expires_at.map_or(false, |exp| Instant::now() > exp)
    }

    pub(crate) fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Cache backed by a map owned by this instance.
///
/// Entries live as long as the instance; nothing is shared between
/// two `ArrayCache` values.
#[derive(Debug, Default)]
pub struct ArrayCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ArrayCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[async_trait]
impl CacheBackend for ArrayCache {
    fn kind(&self) -> CacheKind {
        CacheKind::Array
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let entry = self.entries.read().get(key).cloned();
        let found = match entry {
            Some(entry) if !entry.is_expired() => Some(entry.data),
            Some(_) => {
                // Expired: evict lazily
                self.entries.write().remove(key);
                None
            }
            None => None,
        };

        self.record(found.is_some());
        Ok(found)
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CacheResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }

    async fn forget(&self, key: &str) -> CacheResult<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    async fn flush(&self) -> CacheResult<()> {
        self.entries.write().clear();
        Ok(())
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        Ok(CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            total_keys: self.entries.read().len() as u64,
        })
    }
}
