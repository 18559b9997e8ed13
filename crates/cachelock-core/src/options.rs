//! Declarative lock configuration.

use std::time::Duration;

/// Declarative configuration for a lock-guarded operation.
///
/// Carries the three knobs a caller declares up front: the lock key, the
/// expiry applied to the store entry, and how many acquisition attempts to
/// make before giving up. Consumed by
/// [`LockProviderExt::acquire_with`](crate::traits::LockProviderExt::acquire_with).
///
/// # Example
///
/// ```rust,ignore
/// let options = LockOptions::for_key("order:42")
///     .expiry(Duration::from_secs(5))
///     .retry(3);
/// let handle = provider.acquire_with(&options, retry_interval).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockOptions {
    /// Lock key. Empty by default; acquisition rejects an empty key.
    pub key: String,
    /// Expiry applied to the lock entry. `None` means the provider default.
    pub expiry: Option<Duration>,
    /// Number of acquisition attempts. Values below 1 count as 1.
    pub retry: u32,
}

impl LockOptions {
    /// Options for `key` with the default expiry and a single attempt.
    pub fn for_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Sets the expiry applied to the lock entry.
    pub fn expiry(mut self, expiry: Duration) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Sets the number of acquisition attempts.
    pub fn retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }

    /// Number of attempts to actually make.
    pub fn attempts(&self) -> u32 {
        self.retry.max(1)
    }
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            key: String::new(),
            expiry: None,
            retry: 1,
        }
    }
}
