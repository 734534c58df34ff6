//! `POST /api/thumbnail_upload/:video_id`

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State},
};
use chrono::Utc;
use media::{MediaError, keys};
use mime::Mime;
use std::io;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{VideoId, load_owned_video};
use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::Video,
    state::AppState,
    thumbnails::Thumbnail,
};

/// Multipart field carrying the image
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Store a thumbnail on disk and point the record at its public URL
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    VideoId(video_id): VideoId,
    user: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<Video>> {
    info!(%video_id, user_id = %user.id, "Uploading thumbnail");

    load_owned_video(&state, video_id, user.id).await?;

    let (media_type, data) = receive_thumbnail(&mut multipart).await?;

    let file_name = keys::thumbnail_file_name(&media_type).map_err(|e| match e {
        MediaError::UnknownExtension(t) => {
            ApiError::BadRequest(format!("Unsupported thumbnail type {}", t))
        }
        other => ApiError::Media(other),
    })?;

    let path = state.config.assets_root.join(&file_name);
    tokio::fs::write(&path, &data).await.map_err(|e| {
        error!("Failed to write thumbnail {}: {}", path.display(), e);
        ApiError::Internal("Could not save thumbnail".to_string())
    })?;
    info!(%video_id, bytes = data.len(), "Saved thumbnail as {}", file_name);

    let thumbnail_url = format!(
        "{}/api/thumbnails/{}",
        state.config.public_base_url(),
        file_name
    );

    // The row and the cache must agree on the current file
    let writes = state.thumbnails.lock_writes().await;

    let video = match state
        .videos
        .set_thumbnail_url(video_id, &thumbnail_url, Utc::now())
        .await
    {
        Ok(video) => video,
        Err(e) => {
            drop(writes);
            remove_thumbnail_file(&state, video_id, &file_name).await;
            return Err(e.into());
        }
    };

    let replaced = state.thumbnails.insert(
        video_id,
        Thumbnail {
            file_name: file_name.clone(),
            media_type: media_type.essence_str().to_string(),
            data,
        },
    );
    drop(writes);

    if let Some(previous) = replaced.filter(|p| p.file_name != file_name) {
        remove_thumbnail_file(&state, video_id, &previous.file_name).await;
    }

    Ok(Json(video))
}

async fn receive_thumbnail(multipart: &mut Multipart) -> ApiResult<(Mime, Bytes)> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }

        let media_type: Mime = field
            .content_type()
            .ok_or_else(|| ApiError::BadRequest("Missing Content-Type for thumbnail".to_string()))?
            .parse()
            .map_err(|_| ApiError::BadRequest("Invalid Content-Type header".to_string()))?;
        if media_type.type_() != mime::IMAGE {
            return Err(ApiError::BadRequest("Thumbnail must be an image".to_string()));
        }

        let data = field.bytes().await?;
        return Ok((media_type, data));
    }

    Err(ApiError::BadRequest(format!(
        "Missing form field '{}'",
        THUMBNAIL_FIELD
    )))
}

async fn remove_thumbnail_file(state: &AppState, video_id: Uuid, file_name: &str) {
    let path = state.config.assets_root.join(file_name);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => info!(%video_id, "Removed thumbnail {}", file_name),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(%video_id, "Failed to remove thumbnail {}: {}", file_name, e),
    }
}
