use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::Subscription;
use crate::state::AppState;

/// Payload shared by create, update and preview
#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    pub topic: Option<String>,
    pub channel: Option<String>,
    pub duration: Option<i64>,
}

impl SubscriptionRequest {
    /// Validates the payload into (topic, channel, duration)
    fn validate(self) -> AppResult<(String, Option<String>, Option<i64>)> {
        let topic = self
            .topic
            .filter(|topic| !topic.trim().is_empty())
            .ok_or_else(|| {
                AppError::InvalidInput("Missing required parameter: \"topic\"".to_string())
            })?;

        if let Some(duration) = self.duration {
            if duration < 0 {
                return Err(AppError::InvalidInput(
                    "Parameter \"duration\" must not be negative".to_string(),
                ));
            }
        }

        let channel = self.channel.filter(|channel| !channel.trim().is_empty());

        Ok((topic, channel, self.duration))
    }
}

/// Lists the authenticated user's subscriptions
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Subscription>>> {
    let subscriptions = state.store.find_subscriptions(&user.0).await?;
    Ok(Json(subscriptions))
}

/// Fetches one subscription, owner-checked
pub async fn get_subscription(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(subscription_id): Path<Uuid>,
) -> AppResult<Json<Subscription>> {
    let subscription = load_owned(&state, &user.0, subscription_id).await?;
    Ok(Json(subscription))
}

/// Creates a subscription and invalidates the owner's feed cache
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<SubscriptionRequest>,
) -> AppResult<(StatusCode, Json<Subscription>)> {
    let (topic, channel, duration) = request.validate()?;

    let subscription = Subscription::new(user.0.clone(), topic, channel, duration);
    state.store.insert_subscription(&subscription).await?;
    state.cache.invalidate(&user.0).await;

    Ok((StatusCode::CREATED, Json(subscription)))
}

/// Replaces a subscription's query fields and invalidates the feed cache
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(subscription_id): Path<Uuid>,
    Json(request): Json<SubscriptionRequest>,
) -> AppResult<Json<Value>> {
    let (topic, channel, duration) = request.validate()?;

    let mut subscription = load_owned(&state, &user.0, subscription_id).await?;
    subscription.topic = topic;
    subscription.channel = channel;
    subscription.duration = duration;

    state.store.update_subscription(&subscription).await?;
    state.cache.invalidate(&user.0).await;

    Ok(Json(json!({ "status": "success" })))
}

/// Deletes a subscription and invalidates the feed cache
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(subscription_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let subscription = load_owned(&state, &user.0, subscription_id).await?;

    state.store.delete_subscription(subscription.id).await?;
    state.cache.invalidate(&user.0).await;

    Ok(Json(json!({ "status": "success" })))
}

/// Runs one provider query without persisting anything, so clients can show
/// what a subscription would return before saving it
pub async fn preview(
    State(state): State<AppState>,
    Json(request): Json<SubscriptionRequest>,
) -> AppResult<Json<Value>> {
    let (topic, channel, duration) = request.validate()?;

    let videos = state
        .source
        .query(&topic, channel.as_deref(), duration)
        .await;

    Ok(Json(json!({ "videos": videos })))
}

/// Loads a subscription and validates that the user may act on it
async fn load_owned(
    state: &AppState,
    owner: &str,
    subscription_id: Uuid,
) -> AppResult<Subscription> {
    let subscription = state
        .store
        .find_subscription(subscription_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No subscription with this id found".to_string()))?;

    if subscription.owner != owner {
        return Err(AppError::AccessDenied(
            "You don't have access to this subscription".to_string(),
        ));
    }

    Ok(subscription)
}
