//! Redis lock provider and key-value passthroughs.

use std::time::Duration;

use cachelock_core::error::{LockError, LockResult};
use cachelock_core::options::LockOptions;
use cachelock_core::traits::{LockHandle, LockProvider, LockProviderExt};
use fred::clients::RedisPool;
use fred::interfaces::{ClientLike, HashesInterface, KeysInterface};
use fred::types::{Expiration, ReconnectPolicy, RedisConfig, SetOptions};
use tracing::error;

use crate::handle::RedisLockHandle;
use crate::lock::RedisDistributedLock;

/// Builder for Redis lock provider configuration.
pub struct RedisLockProviderBuilder {
    url: Option<String>,
    pool: Option<RedisPool>,
    pool_size: usize,
    expiry: Duration,
    retry_interval: Duration,
}

impl RedisLockProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: None,
            pool: None,
            pool_size: 4,
            expiry: Duration::from_secs(30),
            retry_interval: Duration::from_millis(250),
        }
    }

    /// Sets the Redis server URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Uses an existing connection pool instead of connecting from a URL.
    pub fn pool(mut self, pool: RedisPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Sets the number of pooled connections.
    pub fn pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }

    /// Sets the default lock expiry.
    ///
    /// Used by locks created without a caller-supplied TTL.
    pub fn expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    /// Sets the interval between acquisition attempts.
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Builds the provider, connecting the pool if one was not supplied.
    pub async fn build(self) -> LockResult<RedisLockProvider> {
        let pool = match self.pool {
            Some(pool) => pool,
            None => {
                let url = self
                    .url
                    .ok_or_else(|| LockError::Config("no Redis URL or pool provided".to_string()))?;

                let config = RedisConfig::from_url(&url)
                    .map_err(|e| LockError::Connection(Box::new(e)))?;

                // Exponential reconnect: initial 0ms, base 100ms, max 30s, factor 2.
                let policy = ReconnectPolicy::new_exponential(0, 100, 30_000, 2);

                let pool = RedisPool::new(config, None, None, Some(policy), self.pool_size)
                    .map_err(|e| LockError::Connection(Box::new(e)))?;

                pool.connect();
                pool.wait_for_connect()
                    .await
                    .map_err(|e| LockError::Connection(Box::new(e)))?;

                pool
            }
        };

        Ok(RedisLockProvider {
            pool,
            expiry: self.expiry,
            retry_interval: self.retry_interval,
        })
    }
}

impl Default for RedisLockProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Provider for Redis-based distributed locks.
///
/// Owns the connection pool and doubles as the key-value façade: besides
/// creating locks it exposes the low-level hash-set and conditional-set
/// operations, with store errors logged and mapped to failure sentinels
/// rather than propagated.
pub struct RedisLockProvider {
    pool: RedisPool,
    expiry: Duration,
    retry_interval: Duration,
}

impl RedisLockProvider {
    /// Returns a new builder for configuring the provider.
    pub fn builder() -> RedisLockProviderBuilder {
        RedisLockProviderBuilder::new()
    }

    /// Creates a provider using the specified Redis URL and default settings.
    pub async fn new(url: impl Into<String>) -> LockResult<Self> {
        Self::builder().url(url).build().await
    }

    /// Makes a single lock attempt for `key` with expiry `ttl`.
    ///
    /// Contention and store errors both map to `None`; errors are logged.
    /// Callers that need to distinguish them should use
    /// [`LockProviderExt::try_lock`] instead.
    pub async fn lock(&self, key: &str, ttl: Duration) -> Option<RedisLockHandle> {
        match self.try_lock(key, ttl).await {
            Ok(handle) => handle,
            Err(e) => {
                error!(key, error = %e, "lock attempt failed");
                None
            }
        }
    }

    /// Acquires a lock as declared by `options`, honoring its retry count.
    pub async fn lock_with(&self, options: &LockOptions) -> LockResult<Option<RedisLockHandle>> {
        self.acquire_with(options, self.retry_interval).await
    }

    /// Releases `handle`, mapping errors to `false`.
    ///
    /// Returns `true` iff the store entry was deleted by this call.
    pub async fn unlock(&self, handle: RedisLockHandle) -> bool {
        let key = handle.key().to_string();
        match handle.release().await {
            Ok(deleted) => deleted,
            Err(e) => {
                error!(key, error = %e, "unlock failed");
                false
            }
        }
    }

    /// HSET passthrough.
    ///
    /// Returns the number of fields newly created, or `None` on error
    /// (logged).
    pub async fn hash_field_set(&self, key: &str, field: &str, value: &str) -> Option<i64> {
        let result: Result<i64, _> = self.pool.hset(key, (field, value)).await;
        match result {
            Ok(created) => Some(created),
            Err(e) => {
                error!(key, field, error = %e, "hset failed");
                None
            }
        }
    }

    /// SET passthrough with optional condition and expiry.
    ///
    /// Returns the server reply (`"OK"`) when the set applied, `None` when
    /// the condition failed or the call errored (logged).
    pub async fn conditional_set(
        &self,
        key: &str,
        value: &str,
        expiration: Option<Expiration>,
        condition: Option<SetOptions>,
    ) -> Option<String> {
        let result: Result<Option<String>, _> =
            self.pool.set(key, value, expiration, condition, false).await;
        match result {
            Ok(reply) => reply,
            Err(e) => {
                error!(key, error = %e, "conditional set failed");
                None
            }
        }
    }
}

impl LockProvider for RedisLockProvider {
    type Lock = RedisDistributedLock;

    fn create_lock(&self, key: &str) -> Self::Lock {
        self.create_lock_with_ttl(key, self.expiry)
    }

    fn create_lock_with_ttl(&self, key: &str, ttl: Duration) -> Self::Lock {
        RedisDistributedLock::new(
            key.to_string(),
            self.pool.clone(),
            ttl,
            self.retry_interval,
        )
    }
}
