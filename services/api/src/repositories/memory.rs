//! In-process video repository backed by a `HashMap`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::VideoRepository;
use crate::models::Video;

#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: RwLock<HashMap<Uuid, Video>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify(&self, id: Uuid, change: impl FnOnce(&mut Video)) -> DatabaseResult<Video> {
        let mut videos = self.videos.write().await;
        let video = videos
            .get_mut(&id)
            .ok_or(DatabaseError::Query(sqlx::Error::RowNotFound))?;
        change(video);
        Ok(video.clone())
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create_video(&self, video: &Video) -> DatabaseResult<()> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&video.id) {
            return Err(DatabaseError::Query(sqlx::Error::Protocol(format!(
                "video {} already exists",
                video.id
            ))));
        }
        videos.insert(video.id, video.clone());
        Ok(())
    }

    async fn get_video(&self, id: Uuid) -> DatabaseResult<Option<Video>> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn set_video_url(
        &self,
        id: Uuid,
        video_url: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<Video> {
        self.modify(id, |video| {
            video.video_url = Some(video_url.to_string());
            video.updated_at = updated_at;
        })
        .await
    }

    async fn set_thumbnail_url(
        &self,
        id: Uuid,
        thumbnail_url: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<Video> {
        self.modify(id, |video| {
            video.thumbnail_url = Some(thumbnail_url.to_string());
            video.updated_at = updated_at;
        })
        .await
    }
}
