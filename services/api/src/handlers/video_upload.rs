//! `POST /api/video_upload/:video_id`

use axum::{
    Json,
    extract::{Multipart, State},
};
use chrono::Utc;
use media::keys;
use mime::Mime;
use tempfile::TempPath;
use tracing::{error, info};

use super::{VideoId, load_owned_video};
use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::Video,
    staging::{StagedFile, stage_field},
    state::AppState,
};

/// Multipart field carrying the video
pub const VIDEO_FIELD: &str = "video";
const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Stage, probe, remux and publish a video, then point the record at it
pub async fn upload_video(
    State(state): State<AppState>,
    VideoId(video_id): VideoId,
    user: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<Video>> {
    info!(%video_id, user_id = %user.id, "Uploading video");

    load_owned_video(&state, video_id, user.id).await?;

    let staged = receive_video(&mut multipart, &state).await?;

    let aspect = state.media_tool.aspect_ratio(&staged).await?;
    let processed = StagedFile::new(state.media_tool.faststart(&staged).await?);

    let key = keys::video_object_key(aspect)?;
    let video_url = state.object_store.public_url(&key);
    info!(%video_id, %key, "Publishing processed video");

    state
        .object_store
        .put_file(&key, VIDEO_CONTENT_TYPE, processed.path())
        .await?;

    let video = state
        .videos
        .set_video_url(video_id, &video_url, Utc::now())
        .await
        .inspect_err(|e| error!(%video_id, %key, "Uploaded object left unreferenced: {}", e))?;

    Ok(Json(video))
}

/// Find the video field, check its declared type and stream it to disk
async fn receive_video(multipart: &mut Multipart, state: &AppState) -> ApiResult<TempPath> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .ok_or_else(|| ApiError::BadRequest("Missing Content-Type for video".to_string()))?;
        let media_type: Mime = content_type
            .parse()
            .map_err(|_| ApiError::BadRequest("Invalid Content-Type header".to_string()))?;
        if media_type.essence_str() != VIDEO_CONTENT_TYPE {
            return Err(ApiError::BadRequest("File is not an mp4 video".to_string()));
        }

        return stage_field(&mut field, &state.config.staging_dir()).await;
    }

    Err(ApiError::BadRequest(format!(
        "Missing form field '{}'",
        VIDEO_FIELD
    )))
}
