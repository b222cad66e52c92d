//! Memcached backend on top of the `memcache` client

use crate::{CacheBackend, CacheError, CacheKind, CacheResult};
use ::memcache::{Client, MemcacheError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Relative expirations above this are read by memcached as unix timestamps
const MAX_RELATIVE_EXPIRY: u64 = 60 * 60 * 24 * 30;

/// Longest key memcached accepts
const MAX_KEY_LENGTH: usize = 250;

/// Memcached connection configuration
#[derive(Debug, Clone)]
pub struct MemcacheConfig {
    /// Servers as `host:port` or `memcache://` URLs
    pub servers: Vec<String>,

    /// Connection timeout
    pub connection_timeout: Duration,

    /// Command timeout
    pub operation_timeout: Duration,

    /// Key prefix for all cache keys
    pub key_prefix: Option<String>,
}

impl Default for MemcacheConfig {
    fn default() -> Self {
        Self {
            servers: vec!["127.0.0.1:11211".to_string()],
            connection_timeout: Duration::from_secs(1),
            operation_timeout: Duration::from_secs(1),
            key_prefix: None,
        }
    }
}

impl MemcacheConfig {
    pub fn with_servers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.servers = servers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Server URLs in the form the client connects to
    fn server_urls(&self) -> Vec<String> {
        let timeout = self.connection_timeout.as_secs().max(1);
        self.servers
            .iter()
            .map(|server| {
                let base = if server.contains("://") {
                    server.clone()
                } else {
                    format!("memcache://{}", server)
                };
                let separator = if base.contains('?') { '&' } else { '?' };
                format!("{}{}connect_timeout={}", base, separator, timeout)
            })
            .collect()
    }
}

/// Memcached cache backend.
///
/// Construction never touches the network. The client is created on first
/// use and dropped again after any failure, so the next call reconnects.
pub struct MemcacheCache {
    config: MemcacheConfig,
    client: Mutex<Option<Arc<Client>>>,
}

impl MemcacheCache {
    /// Backend for the default local server
    pub fn new() -> Self {
        Self::with_config(MemcacheConfig::default())
    }

    pub fn with_config(config: MemcacheConfig) -> Self {
        Self {
            config,
            client: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &MemcacheConfig {
        &self.config
    }

    fn full_key(&self, key: &str) -> CacheResult<String> {
        let full = match &self.config.key_prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key.to_string(),
        };

        if full.is_empty()
            || full.len() > MAX_KEY_LENGTH
            || full.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(CacheError::Backend(format!("Invalid memcache key: {:?}", full)));
        }
        Ok(full)
    }

    async fn client(&self) -> CacheResult<Arc<Client>> {
        let mut slot = self.client.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        if self.config.servers.is_empty() {
            return Err(CacheError::Backend("No memcache servers configured".to_string()));
        }

        let urls = self.config.server_urls();
        debug!("Connecting to memcache servers {:?}", self.config.servers);

        let operation_timeout = self.config.operation_timeout;
        let connect = blocking(self.config.connection_timeout, move || {
            let client = Client::connect(urls)?;
            client.set_read_timeout(Some(operation_timeout))?;
            client.set_write_timeout(Some(operation_timeout))?;
            Ok(client)
        })
        .await;

        match connect {
            Ok(client) => {
                let client = Arc::new(client);
                *slot = Some(client.clone());
                Ok(client)
            }
            Err(e) => {
                warn!("Failed to connect to memcache servers {:?}: {}", self.config.servers, e);
                Err(e)
            }
        }
    }

    /// Run one client call off the async runtime, dropping the client on failure
    async fn execute<T, F>(&self, command: &'static str, call: F) -> CacheResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Client) -> Result<T, MemcacheError> + Send + 'static,
    {
        let client = self.client().await?;
        let result = blocking(self.config.operation_timeout, move || call(client.as_ref())).await;

        if let Err(e) = &result {
            warn!("Memcache {} failed: {}", command, e);
            *self.client.lock().await = None;
        }
        result
    }
}

impl Default for MemcacheCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemcacheCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemcacheCache")
            .field("servers", &self.config.servers)
            .finish()
    }
}

/// The client does blocking socket I/O, so every call runs on the blocking pool
async fn blocking<T, F>(timeout: Duration, call: F) -> CacheResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, MemcacheError> + Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(call)).await {
        Err(_) => Err(CacheError::Timeout),
        Ok(Err(join)) => Err(CacheError::Backend(format!("Memcache task failed: {}", join))),
        Ok(Ok(result)) => result.map_err(cache_error),
    }
}

fn cache_error(error: MemcacheError) -> CacheError {
    match error {
        MemcacheError::IOError(e) => CacheError::Network(e.to_string()),
        MemcacheError::PoolError(e) => CacheError::Network(e.to_string()),
        other => CacheError::Protocol(other.to_string()),
    }
}

fn expiry(ttl: Option<Duration>) -> u32 {
    let seconds = match ttl {
        None => 0,
        Some(ttl) if ttl.as_secs() <= MAX_RELATIVE_EXPIRY => ttl.as_secs().max(1),
        Some(ttl) => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|now| now.as_secs().saturating_add(ttl.as_secs()))
            .unwrap_or(0),
    };
    u32::try_from(seconds).unwrap_or(u32::MAX)
}

#[async_trait]
impl CacheBackend for MemcacheCache {
    fn kind(&self) -> CacheKind {
        CacheKind::Memcache
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let key = self.full_key(key)?;
        self.execute("get", move |client| client.get::<Vec<u8>>(&key)).await
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CacheResult<()> {
        let key = self.full_key(key)?;
        let expiration = expiry(ttl);
        self.execute("set", move |client| client.set(&key, value.as_slice(), expiration))
            .await
    }

    async fn forget(&self, key: &str) -> CacheResult<bool> {
        let key = self.full_key(key)?;
        self.execute("delete", move |client| client.delete(&key)).await
    }

    async fn flush(&self) -> CacheResult<()> {
        self.execute("flush", |client| client.flush()).await
    }
}
