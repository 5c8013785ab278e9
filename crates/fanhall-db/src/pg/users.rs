//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use fanhall_types::UserId;

use crate::error::DbResult;
use crate::models::UserRow;
use crate::repo::{UpdateProfile, UserRepository};

/// PostgreSQL user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> DbResult<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, description, avatar, created_at FROM users ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: UserId) -> DbResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, description, avatar, created_at FROM users WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, description, avatar, created_at \
             FROM users WHERE username = $1::CITEXT",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_profile(&self, id: UserId, update: UpdateProfile) -> DbResult<()> {
        sqlx::query(
            "UPDATE users SET edited_by = $1, description = $3, avatar = $4 WHERE id = $2",
        )
        .bind(update.edited_by.0)
        .bind(id.0)
        .bind(&update.description)
        .bind(&update.avatar)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn history(&self, id: UserId) -> DbResult<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, description, avatar, created_at \
             FROM users_history($1) ORDER BY edited_at DESC",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
