use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::cache::{CacheBackend, CacheKey};
use crate::error::AppResult;

/// In-process cache storage
///
/// Backs the test suite. Entries expire against `tokio::time::Instant`, so
/// tests driving a paused clock see real TTL behavior.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &CacheKey) -> AppResult<Option<String>> {
        let key = key.to_string();
        let mut entries = self.entries.lock().await;

        let expired = matches!(entries.get(&key), Some((_, expires_at)) if *expires_at <= Instant::now());
        if expired {
            entries.remove(&key);
            return Ok(None);
        }

        Ok(entries.get(&key).map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> AppResult<()> {
        let expires_at = Instant::now() + ttl;
        self.entries
            .lock()
            .await
            .insert(key.to_string(), (value, expires_at));
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> AppResult<()> {
        self.entries.lock().await.remove(&key.to_string());
        Ok(())
    }
}
