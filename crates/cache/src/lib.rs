//! # ormstrap-cache
//!
//! Cache adapters used by the ORM for parsed mapping metadata and compiled
//! query plans.
//!
//! - [`ArrayCache`]: per-instance in-process map, the default
//! - [`ApcCache`] / [`XcacheCache`]: process-wide shared-memory segments
//! - [`MemcacheCache`]: memcached servers through the `memcache` client
//!
//! ```rust
//! use ormstrap_cache::{ArrayCache, CacheBackend, CacheKind};
//!
//! # tokio_test::block_on(async {
//! let cache = ArrayCache::new();
//! cache.put("metadata:User", b"mapping".to_vec(), None).await.unwrap();
//!
//! assert_eq!(cache.kind(), CacheKind::Array);
//! assert_eq!(cache.get("metadata:User").await.unwrap(), Some(b"mapping".to_vec()));
//! # });
//! ```

use std::time::Duration;
use async_trait::async_trait;
use thiserror::Error;

pub mod backends;

pub use backends::*;

/// Cache operation errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Timeout error")]
    Timeout,
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// The cache adapters the ORM can be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Apc,
    Memcache,
    Xcache,
    Array,
}

impl CacheKind {
    pub fn name(&self) -> &'static str {
        match self {
            CacheKind::Apc => "apc",
            CacheKind::Memcache => "memcache",
            CacheKind::Xcache => "xcache",
            CacheKind::Array => "array",
        }
    }
}

impl std::fmt::Display for CacheKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Core cache backend trait that all cache adapters implement
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Which adapter this is
    fn kind(&self) -> CacheKind;

    /// Get a value from the cache
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Put a value in the cache with optional TTL
    async fn put(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CacheResult<()>;

    /// Remove a value from the cache
    async fn forget(&self, key: &str) -> CacheResult<bool>;

    /// Check if a key exists in the cache
    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Clear all entries from the cache
    async fn flush(&self) -> CacheResult<()>;

    /// Get cache statistics (if supported)
    async fn stats(&self) -> CacheResult<CacheStats> {
        Ok(CacheStats::default())
    }
}

impl std::fmt::Debug for dyn CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheBackend")
            .field("kind", &self.kind())
            .finish()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub total_keys: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}
