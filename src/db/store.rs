use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Subscription, WatchStatus};

/// Durable storage for subscriptions and watch state
///
/// All lookups are keyed by owner; handlers enforce that a user only ever
/// reads or mutates their own records.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// All subscriptions belonging to one user
    async fn find_subscriptions(&self, owner: &str) -> AppResult<Vec<Subscription>>;

    /// A single subscription by id, regardless of owner
    async fn find_subscription(&self, id: Uuid) -> AppResult<Option<Subscription>>;

    async fn insert_subscription(&self, subscription: &Subscription) -> AppResult<()>;

    async fn update_subscription(&self, subscription: &Subscription) -> AppResult<()>;

    async fn delete_subscription(&self, id: Uuid) -> AppResult<()>;

    /// Watch marks for one user restricted to the given video ids, fetched in
    /// a single batched query
    async fn find_watch_statuses(
        &self,
        owner: &str,
        video_ids: &[String],
    ) -> AppResult<Vec<WatchStatus>>;

    async fn find_watch_status(
        &self,
        owner: &str,
        video_id: &str,
    ) -> AppResult<Option<WatchStatus>>;

    async fn insert_watch_status(&self, status: &WatchStatus) -> AppResult<()>;

    async fn delete_watch_status(&self, id: Uuid) -> AppResult<()>;
}

/// PostgreSQL-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn find_subscriptions(&self, owner: &str) -> AppResult<Vec<Subscription>> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            "SELECT id, owner, topic, channel, duration FROM subscriptions WHERE owner = $1",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }

    async fn find_subscription(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(
            "SELECT id, owner, topic, channel, duration FROM subscriptions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn insert_subscription(&self, subscription: &Subscription) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO subscriptions (id, owner, topic, channel, duration) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(subscription.id)
        .bind(&subscription.owner)
        .bind(&subscription.topic)
        .bind(&subscription.channel)
        .bind(subscription.duration)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_subscription(&self, subscription: &Subscription) -> AppResult<()> {
        sqlx::query("UPDATE subscriptions SET topic = $2, channel = $3, duration = $4 WHERE id = $1")
            .bind(subscription.id)
            .bind(&subscription.topic)
            .bind(&subscription.channel)
            .bind(subscription.duration)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_subscription(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_watch_statuses(
        &self,
        owner: &str,
        video_ids: &[String],
    ) -> AppResult<Vec<WatchStatus>> {
        let statuses = sqlx::query_as::<_, WatchStatus>(
            "SELECT id, owner, video_id, marked_at FROM watch_statuses \
             WHERE owner = $1 AND video_id = ANY($2)",
        )
        .bind(owner)
        .bind(video_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(statuses)
    }

    async fn find_watch_status(
        &self,
        owner: &str,
        video_id: &str,
    ) -> AppResult<Option<WatchStatus>> {
        let status = sqlx::query_as::<_, WatchStatus>(
            "SELECT id, owner, video_id, marked_at FROM watch_statuses \
             WHERE owner = $1 AND video_id = $2",
        )
        .bind(owner)
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(status)
    }

    async fn insert_watch_status(&self, status: &WatchStatus) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO watch_statuses (id, owner, video_id, marked_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(status.id)
        .bind(&status.owner)
        .bind(&status.video_id)
        .bind(status.marked_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_watch_status(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM watch_statuses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
