//! Distributed mutual-exclusion locks over a shared Redis store.
//!
//! A lock is a transient store entry: acquiring it is one atomic
//! SET-if-absent with a TTL, and releasing it is an atomic
//! compare-and-delete that only removes an entry the caller still owns.
//! Ownership is proven by an opaque token generated per acquisition and
//! threaded explicitly through the returned handle.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cachelock::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect once at startup
//!     let provider = RedisLockProvider::new("redis://localhost:6379").await?;
//!
//!     // One attempt; the entry expires after 5 seconds if never released
//!     if let Some(handle) = provider.lock("order:42", Duration::from_secs(5)).await {
//!         // Critical section - we have exclusive access
//!         println!("doing critical work...");
//!
//!         // Release; true iff our entry was still there to delete
//!         let released = provider.unlock(handle).await;
//!         assert!(released);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Declarative options
//!
//! Operations that want their locking declared up front carry a
//! [`LockOptions`] value (key, expiry, retry count) and hand it to
//! [`RedisLockProvider::lock_with`], which honors the retry count:
//!
//! ```rust,no_run
//! # use cachelock::*;
//! # use std::time::Duration;
//! # async fn demo(provider: &RedisLockProvider) -> LockResult<()> {
//! let options = LockOptions::for_key("inventory:refresh")
//!     .expiry(Duration::from_secs(10))
//!     .retry(3);
//! if let Some(handle) = provider.lock_with(&options).await? {
//!     // ...
//!     handle.release().await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Crate Organization
//!
//! This is a meta-crate that re-exports types from:
//! - `cachelock-core`: core traits and types
//! - `cachelock-redis`: the Redis backend
//!
//! For fine-grained control, you can depend on the individual crates instead.

// Re-export core types and traits
pub use cachelock_core::*;

// Re-export redis backend
#[allow(ambiguous_glob_reexports)]
pub use cachelock_redis::*;
