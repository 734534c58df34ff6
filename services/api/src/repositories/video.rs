//! PostgreSQL video repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use uuid::Uuid;

use super::VideoRepository;
use crate::models::Video;

/// Video repository for database operations
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    /// Create a new video repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn create_video(&self, video: &Video) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO videos (id, user_id, created_at, updated_at, thumbnail_url, video_url, title, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(video.id)
        .bind(video.user_id)
        .bind(video.created_at)
        .bind(video.updated_at)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(&video.title)
        .bind(&video.description)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(())
    }

    async fn get_video(&self, id: Uuid) -> DatabaseResult<Option<Video>> {
        sqlx::query_as::<_, Video>(
            r#"
            SELECT id, user_id, created_at, updated_at, thumbnail_url, video_url, title, description
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    async fn set_video_url(
        &self,
        id: Uuid,
        video_url: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<Video> {
        sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET video_url = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, user_id, created_at, updated_at, thumbnail_url, video_url, title, description
            "#,
        )
        .bind(id)
        .bind(video_url)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?
        .ok_or(DatabaseError::Query(sqlx::Error::RowNotFound))
    }

    async fn set_thumbnail_url(
        &self,
        id: Uuid,
        thumbnail_url: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<Video> {
        sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET thumbnail_url = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, user_id, created_at, updated_at, thumbnail_url, video_url, title, description
            "#,
        )
        .bind(id)
        .bind(thumbnail_url)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?
        .ok_or(DatabaseError::Query(sqlx::Error::RowNotFound))
    }
}
