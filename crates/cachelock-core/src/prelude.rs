//! Convenience prelude for cache lock types.

pub use crate::error::{LockError, LockResult};
pub use crate::options::LockOptions;
pub use crate::token::OwnerToken;
pub use crate::traits::{DistributedLock, LockHandle, LockProvider, LockProviderExt};
