//! API service routes

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{
    handlers::{get_thumbnail, upload_thumbnail, upload_video},
    state::AppState,
};

/// Largest accepted video upload request
pub const MAX_VIDEO_UPLOAD_BYTES: usize = 1 << 30;
/// Largest accepted thumbnail upload request
pub const MAX_THUMBNAIL_UPLOAD_BYTES: usize = 10 << 20;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    // Upload handlers authenticate through the `AuthUser` extractor
    let upload_routes = Router::new()
        .route(
            "/video_upload/:video_id",
            post(upload_video).layer(DefaultBodyLimit::max(MAX_VIDEO_UPLOAD_BYTES)),
        )
        .route(
            "/thumbnail_upload/:video_id",
            post(upload_thumbnail).layer(DefaultBodyLimit::max(MAX_THUMBNAIL_UPLOAD_BYTES)),
        );

    let api_routes = Router::new()
        .route("/thumbnails/:filename", get(get_thumbnail))
        .merge(upload_routes);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "tubely-api"
    }))
}
