//! Repository for account lookups

use async_trait::async_trait;
use cliphost_core::models::User;
use cliphost_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Operations the service layer needs against user accounts.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Look up a user by ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

/// Postgres-backed user repository
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepositoryTrait for PostgresUserRepository {
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>(
            r#"
            SELECT id, username, email, avatar_url, has_channel, channel_id,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
