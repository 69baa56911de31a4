use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client as HttpClient;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::Video;

/// Newest-first page size requested per subscription query
const RESULT_PAGE_SIZE: u32 = 25;

/// Source of video search results
///
/// `query` is total: upstream failures are handled inside the implementation
/// and collapse to an empty result, so one broken subscription can never abort
/// a whole feed build.
#[async_trait::async_trait]
pub trait VideoSource: Send + Sync {
    /// Load the newest videos matching one subscription
    async fn query(
        &self,
        topic: &str,
        channel: Option<&str>,
        min_duration_minutes: Option<i64>,
    ) -> Vec<Video>;
}

/// Client for the MediathekViewWeb search API
#[derive(Clone)]
pub struct MediathekClient {
    http_client: HttpClient,
    api_url: String,
}

impl MediathekClient {
    /// Creates a client with a bounded request timeout toward the provider
    pub fn new(api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_url,
        })
    }

    /// Builds the provider query body for one subscription
    fn build_query(topic: &str, channel: Option<&str>, min_duration_minutes: Option<i64>) -> Value {
        let mut queries = vec![json!({
            "fields": ["topic"],
            "query": topic,
        })];

        if let Some(channel) = channel {
            queries.push(json!({
                "fields": ["channel"],
                "query": channel,
            }));
        }

        let mut body = json!({
            "queries": queries,
            "sortBy": "timestamp",
            "sortOrder": "desc",
            "future": false,
            "offset": 0,
            "size": RESULT_PAGE_SIZE,
        });

        if let Some(minutes) = min_duration_minutes {
            body["duration_min"] = json!(minutes * 60);
        }

        body
    }

    async fn fetch(
        &self,
        topic: &str,
        channel: Option<&str>,
        min_duration_minutes: Option<i64>,
    ) -> AppResult<Vec<Video>> {
        let body = Self::build_query(topic, channel, min_duration_minutes);

        let response = self
            .http_client
            .post(&self.api_url)
            // The provider rejects application/json; it wants the JSON body
            // declared as plain text.
            .header(CONTENT_TYPE, "text/plain")
            .body(body.to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Mediathek API returned status {}: {}",
                status, body
            )));
        }

        let payload: Value = response.json().await?;
        let results = payload["result"]["results"].as_array().ok_or_else(|| {
            AppError::ExternalApi("Response does not contain the result.results path".to_string())
        })?;

        let videos: Vec<Video> = results.iter().filter_map(Video::from_search_result).collect();

        if videos.len() < results.len() {
            tracing::warn!(
                topic = %topic,
                skipped = results.len() - videos.len(),
                "Skipped incomplete video records from provider"
            );
        }

        Ok(videos)
    }
}

#[async_trait::async_trait]
impl VideoSource for MediathekClient {
    async fn query(
        &self,
        topic: &str,
        channel: Option<&str>,
        min_duration_minutes: Option<i64>,
    ) -> Vec<Video> {
        match self.fetch(topic, channel, min_duration_minutes).await {
            Ok(videos) => {
                tracing::info!(
                    topic = %topic,
                    results = videos.len(),
                    "Subscription query completed"
                );
                videos
            }
            Err(e) => {
                tracing::error!(
                    topic = %topic,
                    error = %e,
                    "Subscription query failed, returning no videos"
                );
                Vec::new()
            }
        }
    }
}
