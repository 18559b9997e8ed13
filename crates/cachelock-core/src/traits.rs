//! Core traits for distributed locks.

use std::future::Future;
use std::time::Duration;

use crate::error::{LockError, LockResult};
use crate::options::LockOptions;
use crate::token::OwnerToken;

// ============================================================================
// Lock Handle Trait
// ============================================================================

/// Handle to a held distributed lock.
///
/// The handle carries the owner token generated for the acquisition that
/// created it, so the proof of ownership travels explicitly with the caller
/// instead of living in shared mutable state. Call `release()` to give the
/// lock up; a handle that is simply dropped leaves the entry to expire via
/// its TTL.
///
/// # Example
///
/// ```rust,ignore
/// if let Some(handle) = lock.try_acquire().await? {
///     do_work().await;
///     let released = handle.release().await?;
///     assert!(released);
/// }
/// ```
pub trait LockHandle: Send + Sync + Sized {
    /// The token this acquisition was made with.
    fn token(&self) -> &OwnerToken;

    /// Releases the lock if this handle still owns it.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The store entry was deleted.
    /// * `Ok(false)` - The entry had already expired, or another owner has
    ///   since acquired the key; nothing was deleted.
    /// * `Err(...)` - Backend error during release.
    fn release(self) -> impl Future<Output = LockResult<bool>> + Send;
}

// ============================================================================
// Distributed Lock Trait
// ============================================================================

/// A distributed mutual exclusion lock.
///
/// Provides exclusive access to a resource identified by `key` across
/// processes and machines. The backend determines how the lock is stored;
/// every backend enforces the same contract: acquisition is a single atomic
/// conditional set, and release only removes an entry the caller still owns.
pub trait DistributedLock: Send + Sync {
    /// The handle type returned when the lock is acquired.
    type Handle: LockHandle + Send;

    /// Returns the key identifying this lock in the store.
    fn key(&self) -> &str;

    /// Acquires the lock, retrying until `timeout` elapses.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Maximum time to wait. `None` means wait indefinitely.
    ///
    /// # Returns
    ///
    /// * `Ok(handle)` - Lock acquired successfully
    /// * `Err(LockError::Timeout)` - Timeout expired before lock acquired
    /// * `Err(LockError::Backend)` - Backend error during an attempt
    fn acquire(
        &self,
        timeout: Option<Duration>,
    ) -> impl Future<Output = LockResult<Self::Handle>> + Send;

    /// Attempts to acquire the lock without waiting.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(handle))` - Lock acquired successfully
    /// * `Ok(None)` - Lock is held by another owner
    /// * `Err(...)` - Error occurred during the attempt
    fn try_acquire(&self) -> impl Future<Output = LockResult<Option<Self::Handle>>> + Send;
}

// ============================================================================
// Provider Traits
// ============================================================================

/// Factory for creating distributed locks by key.
///
/// Providers encapsulate backend configuration, allowing application code
/// to be backend-agnostic.
///
/// # Example
///
/// ```rust,ignore
/// // Configure once at startup
/// let provider = RedisLockProvider::new(redis_url).await?;
///
/// // Create locks by key anywhere in the application
/// let lock = provider.create_lock("order:42");
/// let handle = lock.try_acquire().await?;
/// ```
pub trait LockProvider: Send + Sync {
    /// The lock type created by this provider.
    type Lock: DistributedLock;

    /// Creates a lock with the given key and the provider's default expiry.
    fn create_lock(&self, key: &str) -> Self::Lock;

    /// Creates a lock with the given key and a caller-supplied expiry.
    fn create_lock_with_ttl(&self, key: &str, ttl: Duration) -> Self::Lock;
}

// ============================================================================
// Convenience Extensions
// ============================================================================

/// Extension trait providing convenience methods for lock providers.
pub trait LockProviderExt: LockProvider {
    /// Makes a single acquisition attempt for `key` with expiry `ttl`.
    ///
    /// Convenience method combining `create_lock_with_ttl` and `try_acquire`.
    fn try_lock(
        &self,
        key: &str,
        ttl: Duration,
    ) -> impl Future<Output = LockResult<Option<<Self::Lock as DistributedLock>::Handle>>> + Send
    where
        Self: Sync,
    {
        async move {
            let lock = self.create_lock_with_ttl(key, ttl);
            lock.try_acquire().await
        }
    }

    /// Acquires a lock as declared by `options`.
    ///
    /// Makes up to [`LockOptions::attempts`] acquisition attempts, sleeping
    /// `retry_interval` between them. Returns `Ok(None)` when every attempt
    /// found the lock held.
    fn acquire_with(
        &self,
        options: &LockOptions,
        retry_interval: Duration,
    ) -> impl Future<Output = LockResult<Option<<Self::Lock as DistributedLock>::Handle>>> + Send
    where
        Self: Sync,
    {
        async move {
            if options.key.is_empty() {
                return Err(LockError::InvalidKey("empty key".to_string()));
            }

            let lock = match options.expiry {
                Some(ttl) => self.create_lock_with_ttl(&options.key, ttl),
                None => self.create_lock(&options.key),
            };

            let attempts = options.attempts();
            for attempt in 0..attempts {
                if let Some(handle) = lock.try_acquire().await? {
                    return Ok(Some(handle));
                }
                if attempt + 1 < attempts {
                    tokio::time::sleep(retry_interval).await;
                }
            }
            Ok(None)
        }
    }
}

// Blanket implementation for all LockProviders
impl<T: LockProvider> LockProviderExt for T {}
