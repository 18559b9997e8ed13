//! Redis distributed lock implementation.

use std::time::Duration;

use cachelock_core::error::{LockError, LockResult};
use cachelock_core::token::OwnerToken;
use cachelock_core::traits::DistributedLock;
use fred::clients::RedisPool;
use fred::interfaces::KeysInterface;
use fred::types::{Expiration, SetOptions};
use tracing::{debug, instrument};

use crate::handle::RedisLockHandle;

/// Lua script releasing the lock only while the owner token still matches.
///
/// GET, compare, and DEL as separate round trips would race with a concurrent
/// expiry or re-acquisition; the script makes check-and-delete one atomic
/// server-side step.
pub(crate) const RELEASE_SCRIPT: &str = r#"
    if redis.call('get', KEYS[1]) == ARGV[1] then
        return redis.call('del', KEYS[1])
    end
    return 0
"#;

/// A Redis-based distributed lock for a single key.
///
/// Acquisition is one atomic `SET key token NX PX ttl`; the entry expires on
/// its own unless released earlier by the owner.
pub struct RedisDistributedLock {
    key: String,
    pool: RedisPool,
    ttl: Duration,
    retry_interval: Duration,
}

impl RedisDistributedLock {
    /// Creates a new Redis distributed lock.
    pub(crate) fn new(
        key: String,
        pool: RedisPool,
        ttl: Duration,
        retry_interval: Duration,
    ) -> Self {
        Self {
            key,
            pool,
            ttl,
            retry_interval,
        }
    }

    /// Issues the conditional set for `token`.
    ///
    /// SET NX returns the server reply when the key was set, nil if the key
    /// already exists.
    async fn set_if_absent(&self, token: &OwnerToken) -> LockResult<bool> {
        let ttl_millis = self.ttl.as_millis() as i64;

        let reply: Option<String> = self
            .pool
            .set(
                &self.key,
                token.as_str(),
                Some(Expiration::PX(ttl_millis)),
                Some(SetOptions::NX),
                false,
            )
            .await
            .map_err(|e| LockError::Backend(Box::new(e)))?;

        Ok(reply.is_some())
    }
}

impl DistributedLock for RedisDistributedLock {
    type Handle = RedisLockHandle;

    fn key(&self) -> &str {
        &self.key
    }

    #[instrument(
        skip(self),
        fields(lock.key = %self.key, ttl_ms = self.ttl.as_millis() as u64, timeout = ?timeout, backend = "redis")
    )]
    async fn acquire(&self, timeout: Option<Duration>) -> LockResult<Self::Handle> {
        let deadline = timeout.map(|t| tokio::time::Instant::now() + t);

        loop {
            if let Some(handle) = self.try_acquire().await? {
                return Ok(handle);
            }

            let wait = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
                    if remaining.is_zero() {
                        return Err(LockError::Timeout(timeout.unwrap_or_default()));
                    }
                    self.retry_interval.min(remaining)
                }
                None => self.retry_interval,
            };
            tokio::time::sleep(wait).await;
        }
    }

    #[instrument(skip(self), fields(lock.key = %self.key, backend = "redis"))]
    async fn try_acquire(&self) -> LockResult<Option<Self::Handle>> {
        let token = OwnerToken::generate();

        if self.set_if_absent(&token).await? {
            debug!(key = %self.key, "lock acquired");
            Ok(Some(RedisLockHandle::new(
                self.key.clone(),
                token,
                self.pool.clone(),
            )))
        } else {
            debug!(key = %self.key, "lock held by another owner");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_script_checks_token_before_delete() {
        // The compare must happen server-side, in the same script as the DEL.
        let get_pos = RELEASE_SCRIPT.find("get").unwrap();
        let del_pos = RELEASE_SCRIPT.find("del").unwrap();
        assert!(get_pos < del_pos);
        assert!(RELEASE_SCRIPT.contains("ARGV[1]"));
    }
}
