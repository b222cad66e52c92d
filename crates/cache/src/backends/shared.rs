//! Process-wide shared-memory caches.
//!
//! Every instance of a given adapter reads and writes the same segment, so
//! entries survive the instance that stored them for the rest of the
//! process. `flush` clears the whole segment of that adapter.

use super::memory::CacheEntry;
use crate::{CacheBackend, CacheKind, CacheResult, CacheStats};
use async_trait::async_trait;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::time::Duration;

type Segment = DashMap<String, CacheEntry>;

static APC_SEGMENT: Lazy<Segment> = Lazy::new(DashMap::new);
static XCACHE_SEGMENT: Lazy<Segment> = Lazy::new(DashMap::new);

fn segment_get(segment: &Segment, key: &str) -> Option<Vec<u8>> {
    let found = segment.get(key).map(|entry| {
        if entry.is_expired() {
            None
        } else {
            Some(entry.data().to_vec())
        }
    });

    match found {
        Some(Some(data)) => Some(data),
        Some(None) => {
            segment.remove(key);
            None
        }
        None => None,
    }
}

macro_rules! shared_memory_cache {
    ($(#[$meta:meta])* $name:ident, $segment:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $name;

        impl $name {
            pub fn new() -> Self {
                Self
            }
        }

        #[async_trait]
        impl CacheBackend for $name {
            fn kind(&self) -> CacheKind {
                $kind
            }

            async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
                Ok(segment_get(&$segment, key))
            }

            async fn put(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CacheResult<()> {
                $segment.insert(key.to_string(), CacheEntry::new(value, ttl));
                Ok(())
            }

            async fn forget(&self, key: &str) -> CacheResult<bool> {
                Ok($segment.remove(key).is_some())
            }

            async fn flush(&self) -> CacheResult<()> {
                tracing::debug!("Flushing {} segment ({} keys)", $kind, $segment.len());
                $segment.clear();
                Ok(())
            }

            async fn stats(&self) -> CacheResult<CacheStats> {
                Ok(CacheStats {
                    total_keys: $segment.len() as u64,
                    ..CacheStats::default()
                })
            }
        }
    };
}

shared_memory_cache!(
    /// APC user cache: shared by every `ApcCache` in the process
    ApcCache,
    APC_SEGMENT,
    CacheKind::Apc
);

shared_memory_cache!(
    /// XCache variable cache: shared by every `XcacheCache` in the process
    XcacheCache,
    XCACHE_SEGMENT,
    CacheKind::Xcache
);
