use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for basic cache operations.
///
/// Each call is atomic on its own; sequences of calls are not.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns true if the key holds an unexpired value.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache that expires after `ttl`.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Deletes a value from the cache by key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Returns the remaining time to live of a key.
    ///
    /// `None` when the key is absent or has no expiry.
    async fn ttl(&self, key: &str) -> Result<Option<Duration>>;
}
