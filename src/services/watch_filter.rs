use std::collections::HashSet;

use crate::db::Store;
use crate::error::AppResult;
use crate::models::Video;

/// Removes videos the user has already marked watched.
///
/// Watch state for all candidate ids is fetched in one batched store call,
/// never one lookup per video. Relative order of the survivors is preserved.
pub async fn filter_unwatched(
    store: &dyn Store,
    owner: &str,
    videos: Vec<Video>,
) -> AppResult<Vec<Video>> {
    if videos.is_empty() {
        return Ok(videos);
    }

    let video_ids: Vec<String> = videos.iter().map(|v| v.id.clone()).collect();
    let statuses = store.find_watch_statuses(owner, &video_ids).await?;
    let watched: HashSet<String> = statuses.into_iter().map(|s| s.video_id).collect();

    Ok(videos
        .into_iter()
        .filter(|video| !watched.contains(&video.id))
        .collect())
}
