//! Application state shared across handlers

use media::{MediaTool, ObjectStore};
use std::sync::Arc;

use crate::{
    config::AppConfig, middleware::JwtKeys, repositories::VideoRepository,
    thumbnails::ThumbnailCache,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub videos: Arc<dyn VideoRepository>,
    pub object_store: Arc<dyn ObjectStore>,
    pub media_tool: Arc<dyn MediaTool>,
    pub thumbnails: ThumbnailCache,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        videos: Arc<dyn VideoRepository>,
        object_store: Arc<dyn ObjectStore>,
        media_tool: Arc<dyn MediaTool>,
    ) -> Self {
        let jwt = JwtKeys::from_secret(&config.jwt_secret);
        let thumbnails = ThumbnailCache::new(
            config.thumbnail_cache_capacity,
            config.thumbnail_cache_max_bytes,
        );

        Self {
            config: Arc::new(config),
            jwt,
            videos,
            object_store,
            media_tool,
            thumbnails,
        }
    }
}
