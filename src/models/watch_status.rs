use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marks one video as watched by one user.
///
/// At most one row exists per (owner, video_id) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct WatchStatus {
    pub id: Uuid,
    pub owner: String,
    /// Id of the watched video as reported by the search provider
    pub video_id: String,
    pub marked_at: DateTime<Utc>,
}

impl WatchStatus {
    /// Creates a new watch mark for the given owner and video
    pub fn new(owner: String, video_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            video_id,
            marked_at: Utc::now(),
        }
    }
}
