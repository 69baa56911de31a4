use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::WatchStatus;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WatchStatusRequest {
    pub video_id: Option<String>,
}

impl WatchStatusRequest {
    fn video_id(self) -> AppResult<String> {
        self.video_id
            .filter(|video_id| !video_id.trim().is_empty())
            .ok_or_else(|| AppError::InvalidInput("Parameter video_id is missing".to_string()))
    }
}

/// Marks a video as watched
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<WatchStatusRequest>,
) -> AppResult<(StatusCode, Json<WatchStatus>)> {
    let video_id = request.video_id()?;

    if state
        .store
        .find_watch_status(&user.0, &video_id)
        .await?
        .is_some()
    {
        return Err(AppError::InvalidInput(
            "This video is already marked as watched".to_string(),
        ));
    }

    let status = WatchStatus::new(user.0.clone(), video_id);
    state.store.insert_watch_status(&status).await?;

    Ok((StatusCode::CREATED, Json(status)))
}

/// Unmarks a watched video
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<WatchStatusRequest>,
) -> AppResult<Json<Value>> {
    let video_id = request.video_id()?;

    let status = state
        .store
        .find_watch_status(&user.0, &video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video is not marked as watched".to_string()))?;

    state.store.delete_watch_status(status.id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Watch status for video deleted"
    })))
}
