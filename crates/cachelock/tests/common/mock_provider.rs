//! In-memory provider for exercising the lock contract without a Redis
//! server.
//!
//! The store keeps `key -> (token, expiry)` entries and purges expired ones
//! lazily, so TTL behavior can be driven with paused tokio time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cachelock::{DistributedLock, LockError, LockHandle, LockProvider, LockResult, OwnerToken};
use tokio::time::Instant;

#[derive(Default)]
struct Store {
    entries: HashMap<String, (OwnerToken, Instant)>,
}

impl Store {
    fn purge_expired(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, (_, expires_at)| *expires_at > now);
    }
}

/// Handle for a held in-memory lock.
pub struct MemoryLockHandle {
    key: String,
    token: OwnerToken,
    store: Arc<Mutex<Store>>,
}

impl LockHandle for MemoryLockHandle {
    fn token(&self) -> &OwnerToken {
        &self.token
    }

    async fn release(self) -> LockResult<bool> {
        let mut store = self.store.lock().unwrap();
        store.purge_expired();
        let owned = matches!(
            store.entries.get(&self.key),
            Some((owner, _)) if *owner == self.token
        );
        if owned {
            store.entries.remove(&self.key);
        }
        Ok(owned)
    }
}

/// In-memory distributed lock for a single key.
pub struct MemoryLock {
    key: String,
    ttl: Duration,
    store: Arc<Mutex<Store>>,
}

impl DistributedLock for MemoryLock {
    type Handle = MemoryLockHandle;

    fn key(&self) -> &str {
        &self.key
    }

    async fn acquire(&self, timeout: Option<Duration>) -> LockResult<Self::Handle> {
        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            if let Some(handle) = self.try_acquire().await? {
                return Ok(handle);
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(LockError::Timeout(timeout.unwrap_or_default()));
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    async fn try_acquire(&self) -> LockResult<Option<Self::Handle>> {
        let token = OwnerToken::generate();

        let mut store = self.store.lock().unwrap();
        store.purge_expired();
        if store.entries.contains_key(&self.key) {
            return Ok(None);
        }
        store
            .entries
            .insert(self.key.clone(), (token.clone(), Instant::now() + self.ttl));
        drop(store);

        Ok(Some(MemoryLockHandle {
            key: self.key.clone(),
            token,
            store: self.store.clone(),
        }))
    }
}

/// Mock provider backed by a shared in-memory store.
pub struct MemoryLockProvider {
    store: Arc<Mutex<Store>>,
    default_ttl: Duration,
}

impl MemoryLockProvider {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            default_ttl,
        }
    }
}

impl LockProvider for MemoryLockProvider {
    type Lock = MemoryLock;

    fn create_lock(&self, key: &str) -> Self::Lock {
        self.create_lock_with_ttl(key, self.default_ttl)
    }

    fn create_lock_with_ttl(&self, key: &str, ttl: Duration) -> Self::Lock {
        MemoryLock {
            key: key.to_string(),
            ttl,
            store: self.store.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_provider_creates_locks() {
        let provider = MemoryLockProvider::new(Duration::from_secs(30));
        let lock = provider.create_lock("test-lock");
        assert_eq!(lock.key(), "test-lock");
    }
}
