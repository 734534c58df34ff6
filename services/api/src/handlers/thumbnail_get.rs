//! `GET /api/thumbnails/:filename`

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::io;
use std::path::Component;
use tokio_util::io::ReaderStream;
use tracing::error;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Stream a thumbnail from the assets directory. No authentication.
pub async fn get_thumbnail(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    if !is_plain_file_name(&filename) {
        return Err(not_found());
    }

    let path = state.config.assets_root.join(&filename);
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => {
            error!("Failed to open thumbnail {}: {}", path.display(), e);
            return Err(ApiError::Internal("Error reading thumbnail".to_string()));
        }
    };

    let metadata = file.metadata().await.map_err(|e| {
        error!("Failed to stat thumbnail {}: {}", path.display(), e);
        ApiError::Internal("Error reading thumbnail".to_string())
    })?;
    if !metadata.is_file() {
        return Err(not_found());
    }

    let content_type = mime_guess::from_path(&path).first_or_octet_stream();
    let headers = [
        (header::CONTENT_TYPE, content_type.to_string()),
        (header::CONTENT_LENGTH, metadata.len().to_string()),
    ];

    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

fn not_found() -> ApiError {
    ApiError::NotFound("Thumbnail not found".to_string())
}

/// A single normal path component: no separators, `.` or `..`
fn is_plain_file_name(name: &str) -> bool {
    let mut components = std::path::Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}
