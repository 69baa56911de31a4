pub mod backend;
pub mod feed_cache;
pub mod key;
pub mod memory;
pub mod redis;

pub use backend::CacheBackend;
pub use feed_cache::FeedCache;
pub use key::CacheKey;
pub use memory::MemoryBackend;
pub use redis::{create_redis_client, RedisBackend};
