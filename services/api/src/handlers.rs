//! Request handlers and the lookups they share

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::Video,
    state::AppState,
};

pub mod thumbnail_get;
pub mod thumbnail_upload;
pub mod video_upload;

pub use thumbnail_get::get_thumbnail;
pub use thumbnail_upload::upload_thumbnail;
pub use video_upload::upload_video;

fn parse_video_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid video ID".to_string()))
}

/// The `:video_id` path segment, rejected with 400 unless it is a UUID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for VideoId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::BadRequest("Invalid video ID".to_string()))?;
        parse_video_id(&raw).map(VideoId)
    }
}

/// Fetch `video_id` and check that `user_id` owns it
async fn load_owned_video(state: &AppState, video_id: Uuid, user_id: Uuid) -> ApiResult<Video> {
    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user_id) {
        warn!(%video_id, %user_id, "Upload attempted by non-owner");
        return Err(ApiError::Unauthorized(
            "You are not the owner of this video".to_string(),
        ));
    }

    Ok(video)
}
