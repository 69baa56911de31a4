use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex, Weak};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;

use crate::cache::{CacheBackend, CacheKey};
use crate::error::AppResult;
use crate::models::Video;

/// Owner-keyed memoization of the merged feed
///
/// Stores the pre-filter video set per user with a fixed TTL and recomputes it
/// at most once per owner at a time: concurrent requests during a miss wait on
/// the in-flight computation instead of fanning out again.
///
/// Storage failures never fail a feed request; a broken backend degrades to a
/// miss on read and a dropped write.
pub struct FeedCache {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
    flights: StdMutex<HashMap<String, Weak<AsyncMutex<()>>>>,
}

impl FeedCache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self {
            backend,
            ttl,
            flights: StdMutex::new(HashMap::new()),
        }
    }

    /// Returns the cached video set for `owner`, computing and storing it on a
    /// miss.
    pub async fn get_or_compute<F, Fut>(&self, owner: &str, compute: F) -> AppResult<Vec<Video>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Vec<Video>>>,
    {
        let key = CacheKey::Feed(owner.to_string());

        if let Some(videos) = self.lookup(&key).await {
            return Ok(videos);
        }

        let flight = self.flight(&key);
        let _guard = flight.lock().await;

        // A concurrent flight may have populated the entry while we waited.
        if let Some(videos) = self.lookup(&key).await {
            return Ok(videos);
        }

        let videos = compute().await?;
        self.store(&key, &videos).await;

        Ok(videos)
    }

    /// Drops the cached entry for `owner`. Idempotent; invalidating an absent
    /// or already-expired entry is fine.
    pub async fn invalidate(&self, owner: &str) {
        let key = CacheKey::Feed(owner.to_string());
        if let Err(e) = self.backend.delete(&key).await {
            tracing::warn!(key = %key, error = %e, "Cache invalidation failed");
        }
    }

    async fn lookup(&self, key: &CacheKey) -> Option<Vec<Video>> {
        match self.backend.get(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(videos) => Some(videos),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    async fn store(&self, key: &CacheKey, videos: &[Video]) {
        let json = match serde_json::to_string(videos) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Cache serialization error");
                return;
            }
        };

        if let Err(e) = self.backend.set(key, json, self.ttl).await {
            tracing::warn!(key = %key, error = %e, "Cache write failed");
        }
    }

    /// Per-key flight lock. Dead entries are pruned on every access, so the
    /// registry stays bounded by the number of flights actually in progress.
    fn flight(&self, key: &CacheKey) -> Arc<AsyncMutex<()>> {
        let mut flights = self.flights.lock().expect("flight registry poisoned");
        flights.retain(|_, flight| flight.strong_count() > 0);

        let key = key.to_string();
        if let Some(existing) = flights.get(&key).and_then(Weak::upgrade) {
            return existing;
        }

        let created = Arc::new(AsyncMutex::new(()));
        flights.insert(key, Arc::downgrade(&created));
        created
    }
}
