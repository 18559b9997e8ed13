//! Redis lock handle implementation.

use cachelock_core::error::{LockError, LockResult};
use cachelock_core::token::OwnerToken;
use cachelock_core::traits::LockHandle;
use fred::clients::RedisPool;
use fred::interfaces::LuaInterface;
use tracing::{instrument, warn};

use crate::lock::RELEASE_SCRIPT;

/// Handle for a held Redis lock.
///
/// Carries the owner token for the acquisition that created it. Dropping the
/// handle without releasing leaves the entry to expire via its TTL.
pub struct RedisLockHandle {
    key: String,
    token: OwnerToken,
    pool: RedisPool,
}

impl RedisLockHandle {
    pub(crate) fn new(key: String, token: OwnerToken, pool: RedisPool) -> Self {
        Self { key, token, pool }
    }

    /// The key this handle locks.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl LockHandle for RedisLockHandle {
    fn token(&self) -> &OwnerToken {
        &self.token
    }

    #[instrument(skip(self), fields(lock.key = %self.key, backend = "redis"))]
    async fn release(self) -> LockResult<bool> {
        let deleted: i64 = self
            .pool
            .eval(
                RELEASE_SCRIPT,
                vec![self.key.clone()],
                vec![self.token.as_str().to_string()],
            )
            .await
            .map_err(|e| LockError::Backend(Box::new(e)))?;

        if deleted == 0 {
            warn!(key = %self.key, "release: entry expired or owned by another token");
        }
        Ok(deleted == 1)
    }
}
