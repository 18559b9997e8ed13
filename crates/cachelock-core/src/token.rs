//! Owner tokens proving which caller holds a lock.

use std::fmt;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

/// Opaque value identifying a single lock acquisition.
///
/// A fresh token is generated for every acquisition attempt, and releasing a
/// lock requires presenting the token it was acquired with. A caller can
/// therefore never delete an entry that has expired and been re-acquired by
/// another owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerToken(String);

impl OwnerToken {
    /// Generates a fresh token.
    ///
    /// Format: `{process_id}_{counter}_{random}`
    pub fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

        let pid = process::id();

        let mut rng = rand::thread_rng();
        let random: u64 = rng.r#gen();

        Self(format!("{}_{}_{:016x}", pid, counter, random))
    }

    /// The token as stored in the backend.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
