use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    force_refresh: bool,
}

fn default_limit() -> usize {
    20
}

/// Handler for the personalized feed endpoint
pub async fn feed(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<FeedQuery>,
) -> AppResult<Json<Value>> {
    let videos = state
        .feed
        .build_feed(&user.0, params.limit, params.offset, params.force_refresh)
        .await?;

    Ok(Json(json!({ "videos": videos })))
}
