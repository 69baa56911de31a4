use std::time::Duration;

use crate::cache::CacheKey;
use crate::error::AppResult;

/// Key-value storage behind the feed cache
///
/// Implementations must support per-key expiry and explicit deletion; values
/// are pre-serialized JSON strings.
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &CacheKey) -> AppResult<Option<String>>;

    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> AppResult<()>;

    /// Deleting an absent key is not an error
    async fn delete(&self, key: &CacheKey) -> AppResult<()>;
}
