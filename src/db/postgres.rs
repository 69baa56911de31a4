use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Creates a PostgreSQL connection pool and brings the schema up to date
///
/// Migrations are embedded in the binary and run before the pool is handed
/// out, so the subscription and watch-status tables exist before the first
/// request is served.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}
