//! Repository for channels and their ownership bookkeeping

use crate::db::transaction::TransactionGuard;
use async_trait::async_trait;
use cliphost_core::models::{Channel, VideoSummary};
use cliphost_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Fields for a new channel. Image URLs are empty strings when the
/// caller uploaded none.
#[derive(Debug, Clone)]
pub struct NewChannel {
    pub name: String,
    pub description: String,
    pub avatar_url: String,
    pub banner_url: String,
}

/// Partial update for an existing channel. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ChannelEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
}

/// Operations the service layer needs against channels.
#[async_trait]
pub trait ChannelRepositoryTrait: Send + Sync {
    /// Look up a channel by ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Channel>, AppError>;

    /// Insert a channel and mark its owner as channel-holding, in one
    /// transaction. Either both records land or neither does.
    async fn create_for_owner(
        &self,
        owner_id: Uuid,
        new_channel: NewChannel,
    ) -> Result<Channel, AppError>;

    /// Apply a partial edit scoped to the owner. A new avatar is also
    /// mirrored onto the owner's profile, in the same transaction.
    async fn apply_edit(
        &self,
        channel_id: Uuid,
        owner_id: Uuid,
        edit: ChannelEdit,
    ) -> Result<Channel, AppError>;

    /// List the channel's videos, newest first.
    async fn list_videos(&self, channel_id: Uuid) -> Result<Vec<VideoSummary>, AppError>;
}

/// Uniqueness lives in the schema; there is no pre-insert name lookup.
/// Violations surface as conflicts rather than 500s.
fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return match db.constraint() {
                Some("channels_owner_id_key") => {
                    AppError::Conflict("You already have a channel".to_string())
                }
                _ => AppError::Conflict("Channel name already exists".to_string()),
            };
        }
    }
    AppError::from(e)
}

/// Postgres-backed channel repository
#[derive(Clone)]
pub struct PostgresChannelRepository {
    pool: PgPool,
}

impl PostgresChannelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelRepositoryTrait for PostgresChannelRepository {
    #[tracing::instrument(skip(self), fields(db.table = "channels", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Channel>, AppError> {
        let channel = sqlx::query_as::<Postgres, Channel>(
            r#"
            SELECT id, owner_id, name, description, avatar_url, banner_url,
                   video_count, created_at, updated_at
            FROM channels
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(channel)
    }

    #[tracing::instrument(skip(self, new_channel), fields(db.table = "channels", db.operation = "insert"))]
    async fn create_for_owner(
        &self,
        owner_id: Uuid,
        new_channel: NewChannel,
    ) -> Result<Channel, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;

        let channel = sqlx::query_as::<Postgres, Channel>(
            r#"
            INSERT INTO channels (owner_id, name, description, avatar_url, banner_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_id, name, description, avatar_url, banner_url,
                      video_count, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(&new_channel.name)
        .bind(&new_channel.description)
        .bind(&new_channel.avatar_url)
        .bind(&new_channel.banner_url)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query(
            "UPDATE users SET has_channel = TRUE, channel_id = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(channel.id)
        .bind(owner_id)
        .execute(&mut **tx)
        .await?;

        tx.commit().await?;

        Ok(channel)
    }

    #[tracing::instrument(skip(self, edit), fields(db.table = "channels", db.operation = "update", db.record_id = %channel_id))]
    async fn apply_edit(
        &self,
        channel_id: Uuid,
        owner_id: Uuid,
        edit: ChannelEdit,
    ) -> Result<Channel, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;

        let channel = sqlx::query_as::<Postgres, Channel>(
            r#"
            UPDATE channels
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                avatar_url = COALESCE($3, avatar_url),
                banner_url = COALESCE($4, banner_url),
                updated_at = NOW()
            WHERE id = $5 AND owner_id = $6
            RETURNING id, owner_id, name, description, avatar_url, banner_url,
                      video_count, created_at, updated_at
            "#,
        )
        .bind(&edit.name)
        .bind(&edit.description)
        .bind(&edit.avatar_url)
        .bind(&edit.banner_url)
        .bind(channel_id)
        .bind(owner_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))?;

        if let Some(avatar_url) = &edit.avatar_url {
            sqlx::query("UPDATE users SET avatar_url = $1, updated_at = NOW() WHERE id = $2")
                .bind(avatar_url)
                .bind(owner_id)
                .execute(&mut **tx)
                .await?;
        }

        tx.commit().await?;

        Ok(channel)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %channel_id))]
    async fn list_videos(&self, channel_id: Uuid) -> Result<Vec<VideoSummary>, AppError> {
        let videos = sqlx::query_as::<Postgres, VideoSummary>(
            r#"
            SELECT id, title, thumbnail_url, duration, views, created_at, description, tags
            FROM videos
            WHERE channel_id = $1
            ORDER BY created_at DESC, position DESC
            "#,
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }
}
