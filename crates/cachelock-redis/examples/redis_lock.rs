//! Example: guarding a critical section with a Redis cache lock
//!
//! Run with: `cargo run --example redis_lock`
//!
//! Requires a Redis server. Set REDIS_URL environment variable
//! or modify the URL below.

use std::time::Duration;

use cachelock_core::prelude::*;
use cachelock_redis::RedisLockProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cachelock_redis=debug".into()),
        )
        .init();

    // Get Redis URL from environment or use default
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

    println!("Connecting to Redis...");
    let provider = RedisLockProvider::builder()
        .url(&redis_url)
        .retry_interval(Duration::from_millis(100))
        .build()
        .await?;

    // One attempt: either we get the lock or someone else holds it
    println!("Acquiring lock \"order:42\" with a 5 second TTL...");
    match provider.lock("order:42", Duration::from_secs(5)).await {
        Some(handle) => {
            println!("Lock acquired (token {})", handle.token());

            // Critical section - we have exclusive access
            println!("Doing critical work...");
            tokio::time::sleep(Duration::from_secs(1)).await;

            let released = provider.unlock(handle).await;
            println!("Lock released: {}", released);
        }
        None => {
            println!("Lock is held by another owner (or the store is unreachable)");
        }
    }

    // Declarative form: key, expiry, and retry count carried as options
    let options = LockOptions::for_key("inventory:refresh")
        .expiry(Duration::from_secs(10))
        .retry(3);

    println!("Acquiring \"inventory:refresh\" with up to 3 attempts...");
    if let Some(handle) = provider.lock_with(&options).await? {
        println!("Lock acquired");
        handle.release().await?;
        println!("Lock released");
    } else {
        println!("All attempts found the lock held");
    }

    Ok(())
}
