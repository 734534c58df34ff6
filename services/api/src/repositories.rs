//! Repositories for video records

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::Video;

pub mod memory;
pub mod video;

pub use memory::InMemoryVideoRepository;
pub use video::PgVideoRepository;

/// Storage for video records keyed by ID
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn create_video(&self, video: &Video) -> DatabaseResult<()>;

    async fn get_video(&self, id: Uuid) -> DatabaseResult<Option<Video>>;

    /// Point the record at its processed video, leaving every other column
    /// untouched. Returns the row as stored; fails if the row is gone.
    async fn set_video_url(
        &self,
        id: Uuid,
        video_url: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<Video>;

    /// Same as [`VideoRepository::set_video_url`] for the thumbnail column
    async fn set_thumbnail_url(
        &self,
        id: Uuid,
        thumbnail_url: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<Video>;
}
