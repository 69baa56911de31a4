use std::time::Duration;

use redis::{AsyncCommands, Client};

use crate::cache::{CacheBackend, CacheKey};
use crate::error::AppResult;

/// Creates a Redis client for caching
///
/// Establishes a connection to Redis for fast data caching.
/// Uses connection pooling via the connection-manager feature.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Redis-backed cache storage
///
/// Expiry rides on Redis key TTLs, so cached feeds survive process restarts
/// and are shared between replicas.
#[derive(Clone)]
pub struct RedisBackend {
    redis_client: Client,
}

impl RedisBackend {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait::async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &CacheKey) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;
        Ok(cached)
    }

    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key.to_string(), value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(key.to_string()).await?;
        Ok(())
    }
}
