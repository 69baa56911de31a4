use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use mediafeed_api::auth::{Authenticator, UserinfoAuthenticator};
use mediafeed_api::cache::{create_redis_client, CacheBackend, FeedCache, RedisBackend};
use mediafeed_api::config::Config;
use mediafeed_api::db::{create_pool, PgStore, Store};
use mediafeed_api::routes::create_router;
use mediafeed_api::services::{MediathekClient, VideoSource};
use mediafeed_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let pool = create_pool(&config.database_url).await?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let backend: Arc<dyn CacheBackend> = Arc::new(RedisBackend::new(redis_client));
    let cache = Arc::new(FeedCache::new(
        backend,
        Duration::from_secs(config.feed_cache_ttl_secs),
    ));

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
    let source: Arc<dyn VideoSource> = Arc::new(MediathekClient::new(
        config.mediathek_api_url.clone(),
        Duration::from_secs(config.provider_timeout_secs),
    )?);
    let authenticator: Arc<dyn Authenticator> =
        Arc::new(UserinfoAuthenticator::new(config.userinfo_url.clone()));

    let state = AppState::new(store, source, cache, authenticator);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
