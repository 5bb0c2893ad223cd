//! Repository for videos, including the channel-scoped ingest insert

use crate::db::transaction::TransactionGuard;
use async_trait::async_trait;
use cliphost_core::models::{Video, VideoWithChannel};
use cliphost_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Fields for a freshly ingested video. URLs come from the media store;
/// thumbnail and duration are empty strings when the store produced none.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub channel_id: Uuid,
    pub uploader_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub tags: Vec<String>,
}

/// Operations the service layer needs against videos.
#[async_trait]
pub trait VideoRepositoryTrait: Send + Sync {
    /// Insert a video and bump its channel's video count, in one
    /// transaction. The bumped count doubles as the video's position in
    /// the channel, so membership order survives concurrent ingests.
    async fn create_in_channel(&self, new_video: NewVideo) -> Result<Video, AppError>;

    /// Look up a video by ID together with its channel's display fields.
    async fn find_with_channel(&self, id: Uuid) -> Result<Option<VideoWithChannel>, AppError>;

    /// List every video with channel display fields, newest first.
    async fn list_with_channel(&self) -> Result<Vec<VideoWithChannel>, AppError>;
}

/// Postgres-backed video repository
#[derive(Clone)]
pub struct PostgresVideoRepository {
    pool: PgPool,
}

impl PostgresVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepositoryTrait for PostgresVideoRepository {
    #[tracing::instrument(skip(self, new_video), fields(db.table = "videos", db.operation = "insert"))]
    async fn create_in_channel(&self, new_video: NewVideo) -> Result<Video, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;

        let position = sqlx::query_scalar::<Postgres, i32>(
            r#"
            UPDATE channels
            SET video_count = video_count + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING video_count
            "#,
        )
        .bind(new_video.channel_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))?;

        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            INSERT INTO videos (channel_id, uploader_id, title, description, video_url,
                                thumbnail_url, duration, tags, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, channel_id, uploader_id, title, description, video_url,
                      thumbnail_url, duration, views, tags, position, created_at, updated_at
            "#,
        )
        .bind(new_video.channel_id)
        .bind(new_video.uploader_id)
        .bind(&new_video.title)
        .bind(&new_video.description)
        .bind(&new_video.video_url)
        .bind(&new_video.thumbnail_url)
        .bind(&new_video.duration)
        .bind(&new_video.tags)
        .bind(position)
        .fetch_one(&mut **tx)
        .await?;

        tx.commit().await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn find_with_channel(&self, id: Uuid) -> Result<Option<VideoWithChannel>, AppError> {
        let video = sqlx::query_as::<Postgres, VideoWithChannel>(
            r#"
            SELECT v.id, v.channel_id, v.uploader_id, v.title, v.description, v.video_url,
                   v.thumbnail_url, v.duration, v.views, v.tags, v.position,
                   v.created_at, v.updated_at,
                   c.name AS channel_name, c.avatar_url AS channel_avatar
            FROM videos v
            JOIN channels c ON c.id = v.channel_id
            WHERE v.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn list_with_channel(&self) -> Result<Vec<VideoWithChannel>, AppError> {
        let videos = sqlx::query_as::<Postgres, VideoWithChannel>(
            r#"
            SELECT v.id, v.channel_id, v.uploader_id, v.title, v.description, v.video_url,
                   v.thumbnail_url, v.duration, v.views, v.tags, v.position,
                   v.created_at, v.updated_at,
                   c.name AS channel_name, c.avatar_url AS channel_avatar
            FROM videos v
            JOIN channels c ON c.id = v.channel_id
            ORDER BY v.created_at DESC, v.position DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }
}
