use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::FeedCache;
use crate::db::Store;
use crate::error::AppResult;
use crate::models::Video;
use crate::services::{watch_filter, VideoSource};

/// Builds the personalized video feed
///
/// One provider query per subscription, merged into a cached candidate set,
/// then filtered against watch state, sorted newest-first and paginated.
pub struct FeedService {
    store: Arc<dyn Store>,
    source: Arc<dyn VideoSource>,
    cache: Arc<FeedCache>,
}

impl FeedService {
    pub fn new(store: Arc<dyn Store>, source: Arc<dyn VideoSource>, cache: Arc<FeedCache>) -> Self {
        Self {
            store,
            source,
            cache,
        }
    }

    /// Returns the page `[offset, offset + limit)` of the owner's feed.
    ///
    /// `force_refresh` drops the cached candidate set first, so exactly one
    /// new fan-out runs regardless of TTL state. An offset past the end of
    /// the feed yields an empty page, never an error.
    pub async fn build_feed(
        &self,
        owner: &str,
        limit: usize,
        offset: usize,
        force_refresh: bool,
    ) -> AppResult<Vec<Video>> {
        if force_refresh {
            self.cache.invalidate(owner).await;
        }

        let store = Arc::clone(&self.store);
        let source = Arc::clone(&self.source);
        let owner_key = owner.to_string();

        let merged = self
            .cache
            .get_or_compute(owner, || async move {
                fan_out(store, source, &owner_key).await
            })
            .await?;

        let deduped = dedupe_by_id(merged);
        let mut videos = watch_filter::filter_unwatched(self.store.as_ref(), owner, deduped).await?;

        // Stable sort: equal timestamps keep their merge order.
        videos.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(videos.into_iter().skip(offset).take(limit).collect())
    }
}

/// Queries the provider once per subscription, concurrently, and merges the
/// results. A failed task loses that subscription's videos, nothing more.
async fn fan_out(
    store: Arc<dyn Store>,
    source: Arc<dyn VideoSource>,
    owner: &str,
) -> AppResult<Vec<Video>> {
    let subscriptions = store.find_subscriptions(owner).await?;

    tracing::debug!(
        owner = %owner,
        subscriptions = subscriptions.len(),
        "Fetching video data from provider"
    );

    let mut tasks = Vec::new();
    for subscription in subscriptions {
        let source = Arc::clone(&source);
        tasks.push(tokio::spawn(async move {
            source
                .query(
                    &subscription.topic,
                    subscription.channel.as_deref(),
                    subscription.duration,
                )
                .await
        }));
    }

    let mut videos = Vec::new();
    for task in tasks {
        match task.await {
            Ok(batch) => videos.extend(batch),
            Err(e) => tracing::error!(error = %e, "Subscription fetch task failed"),
        }
    }

    tracing::info!(owner = %owner, videos = videos.len(), "Merged subscription results");

    Ok(videos)
}

/// Two subscriptions may surface the same video; the first occurrence wins.
fn dedupe_by_id(videos: Vec<Video>) -> Vec<Video> {
    let mut seen = HashSet::new();
    videos
        .into_iter()
        .filter(|video| seen.insert(video.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FeedCache, MemoryBackend};
    use crate::db::MockStore;
    use crate::models::{Subscription, WatchStatus};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn video(id: &str, timestamp: i64) -> Video {
        Video {
            id: id.to_string(),
            channel: "BR".to_string(),
            topic: "Ringlstetter".to_string(),
            title: format!("Folge {}", id),
            description: String::new(),
            timestamp,
            duration: 2700,
            url_video: "https://cdn.example/video.mp4".to_string(),
            url_website: "https://example/website".to_string(),
        }
    }

    /// Canned per-topic results plus a fan-out counter
    struct StubSource {
        responses: HashMap<String, Vec<Video>>,
        queries: AtomicUsize,
    }

    impl StubSource {
        fn new(responses: HashMap<String, Vec<Video>>) -> Self {
            Self {
                responses,
                queries: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl VideoSource for StubSource {
        async fn query(
            &self,
            topic: &str,
            _channel: Option<&str>,
            _min_duration_minutes: Option<i64>,
        ) -> Vec<Video> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.responses.get(topic).cloned().unwrap_or_default()
        }
    }

    fn subscription(owner: &str, topic: &str) -> Subscription {
        Subscription::new(owner.to_string(), topic.to_string(), None, None)
    }

    fn new_cache() -> Arc<FeedCache> {
        Arc::new(FeedCache::new(
            Arc::new(MemoryBackend::new()),
            Duration::from_secs(900),
        ))
    }

    fn service_with(store: MockStore, source: Arc<StubSource>) -> (FeedService, Arc<StubSource>) {
        let source_dyn: Arc<dyn VideoSource> = source.clone();
        let service = FeedService::new(Arc::new(store), source_dyn, new_cache());
        (service, source)
    }

    #[tokio::test]
    async fn test_no_subscriptions_yields_empty_feed() {
        let mut store = MockStore::new();
        store
            .expect_find_subscriptions()
            .returning(|_| Ok(Vec::new()));

        let source = Arc::new(StubSource::new(HashMap::new()));
        let (service, _) = service_with(store, source);

        let feed = service.build_feed("user-1", 20, 0, false).await.unwrap();
        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn test_watched_videos_are_excluded_and_sorted() {
        // Two overlapping subscriptions, video 3 already watched,
        // expect [2, 1] newest-first.
        let mut store = MockStore::new();
        store.expect_find_subscriptions().returning(|owner| {
            Ok(vec![
                subscription(owner, "topic-a"),
                subscription(owner, "topic-b"),
            ])
        });
        store
            .expect_find_watch_statuses()
            .returning(|owner, _| Ok(vec![WatchStatus::new(owner.to_string(), "3".to_string())]));

        let mut responses = HashMap::new();
        responses.insert("topic-a".to_string(), vec![video("1", 100), video("2", 300)]);
        responses.insert("topic-b".to_string(), vec![video("2", 300), video("3", 200)]);
        let source = Arc::new(StubSource::new(responses));

        let (service, _) = service_with(store, source);

        let feed = service.build_feed("user-1", 10, 0, false).await.unwrap();
        let ids: Vec<&str> = feed.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_dedup_keeps_first_occurrence() {
        let mut store = MockStore::new();
        store
            .expect_find_subscriptions()
            .returning(|owner| Ok(vec![subscription(owner, "topic-a")]));
        store
            .expect_find_watch_statuses()
            .returning(|_, _| Ok(Vec::new()));

        let mut first = video("dup", 100);
        first.title = "first".to_string();
        let mut second = video("dup", 100);
        second.title = "second".to_string();

        let mut responses = HashMap::new();
        responses.insert("topic-a".to_string(), vec![first, second]);
        let source = Arc::new(StubSource::new(responses));

        let (service, _) = service_with(store, source);

        let feed = service.build_feed("user-1", 10, 0, false).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].title, "first");
    }

    #[tokio::test]
    async fn test_sort_is_monotonic_and_stable() {
        let mut store = MockStore::new();
        store
            .expect_find_subscriptions()
            .returning(|owner| Ok(vec![subscription(owner, "topic-a")]));
        store
            .expect_find_watch_statuses()
            .returning(|_, _| Ok(Vec::new()));

        let mut responses = HashMap::new();
        responses.insert(
            "topic-a".to_string(),
            vec![
                video("old", 100),
                video("tie-first", 200),
                video("tie-second", 200),
                video("new", 300),
            ],
        );
        let source = Arc::new(StubSource::new(responses));

        let (service, _) = service_with(store, source);

        let feed = service.build_feed("user-1", 10, 0, false).await.unwrap();
        let ids: Vec<&str> = feed.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "tie-first", "tie-second", "old"]);

        for pair in feed.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn test_pagination_slices_are_disjoint_and_contiguous() {
        let mut store = MockStore::new();
        store
            .expect_find_subscriptions()
            .returning(|owner| Ok(vec![subscription(owner, "topic-a")]));
        store
            .expect_find_watch_statuses()
            .returning(|_, _| Ok(Vec::new()));

        let videos: Vec<Video> = (0..5i64).map(|i| video(&format!("v{}", i), 500 - i)).collect();
        let mut responses = HashMap::new();
        responses.insert("topic-a".to_string(), videos);
        let source = Arc::new(StubSource::new(responses));

        let (service, _) = service_with(store, source);

        let first = service.build_feed("user-1", 2, 0, false).await.unwrap();
        let second = service.build_feed("user-1", 2, 2, false).await.unwrap();
        let third = service.build_feed("user-1", 2, 4, false).await.unwrap();

        let ids: Vec<&str> = first
            .iter()
            .chain(second.iter())
            .chain(third.iter())
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(ids, vec!["v0", "v1", "v2", "v3", "v4"]);
    }

    #[tokio::test]
    async fn test_offset_past_end_yields_empty_page() {
        let mut store = MockStore::new();
        store
            .expect_find_subscriptions()
            .returning(|owner| Ok(vec![subscription(owner, "topic-a")]));
        store
            .expect_find_watch_statuses()
            .returning(|_, _| Ok(Vec::new()));

        let mut responses = HashMap::new();
        responses.insert("topic-a".to_string(), vec![video("1", 100)]);
        let source = Arc::new(StubSource::new(responses));

        let (service, _) = service_with(store, source);

        let feed = service.build_feed("user-1", 20, 50, false).await.unwrap();
        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn test_second_request_is_served_from_cache() {
        let mut store = MockStore::new();
        store
            .expect_find_subscriptions()
            .times(1)
            .returning(|owner| Ok(vec![subscription(owner, "topic-a")]));
        store
            .expect_find_watch_statuses()
            .returning(|_, _| Ok(Vec::new()));

        let mut responses = HashMap::new();
        responses.insert("topic-a".to_string(), vec![video("1", 100)]);
        let source = Arc::new(StubSource::new(responses));

        let (service, source) = service_with(store, source);

        service.build_feed("user-1", 20, 0, false).await.unwrap();
        service.build_feed("user-1", 20, 0, false).await.unwrap();

        assert_eq!(source.queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_triggers_new_fan_out() {
        let mut store = MockStore::new();
        store
            .expect_find_subscriptions()
            .returning(|owner| Ok(vec![subscription(owner, "topic-a")]));
        store
            .expect_find_watch_statuses()
            .returning(|_, _| Ok(Vec::new()));

        let mut responses = HashMap::new();
        responses.insert("topic-a".to_string(), vec![video("1", 100)]);
        let source = Arc::new(StubSource::new(responses));

        let (service, source) = service_with(store, source);

        service.build_feed("user-1", 20, 0, false).await.unwrap();
        service.build_feed("user-1", 20, 0, true).await.unwrap();

        assert_eq!(source.queries.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_merge_is_idempotent_over_same_fan_out() {
        let raw = vec![
            video("1", 100),
            video("2", 300),
            video("2", 300),
            video("3", 200),
        ];

        let once = dedupe_by_id(raw.clone());
        let twice = dedupe_by_id(dedupe_by_id(raw));
        assert_eq!(once, twice);
    }
}
