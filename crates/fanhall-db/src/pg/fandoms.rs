//! PostgreSQL fandom repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use fanhall_types::FandomId;

use crate::error::DbResult;
use crate::models::FandomRow;
use crate::repo::{CreateFandom, FandomRepository, UpdateFandom};

/// PostgreSQL fandom repository
#[derive(Clone)]
pub struct PgFandomRepository {
    pool: PgPool,
}

impl PgFandomRepository {
    /// Create a new fandom repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FandomRepository for PgFandomRepository {
    async fn list(&self) -> DbResult<Vec<FandomRow>> {
        let rows = sqlx::query_as::<_, FandomRow>(
            "SELECT id, url, title, description, avatar, created_at \
             FROM fandoms ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: FandomId) -> DbResult<Option<FandomRow>> {
        let row = sqlx::query_as::<_, FandomRow>(
            "SELECT id, url, title, description, avatar, created_at \
             FROM fandoms WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_url(&self, url: &str) -> DbResult<Option<FandomRow>> {
        let row = sqlx::query_as::<_, FandomRow>(
            "SELECT id, url, title, description, avatar, created_at \
             FROM fandoms WHERE url = $1::CITEXT",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, fandom: CreateFandom) -> DbResult<FandomId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO fandoms (url, title, description, avatar, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&fandom.url)
        .bind(&fandom.title)
        .bind(&fandom.description)
        .bind(&fandom.avatar)
        .bind(fandom.created_by.0)
        .fetch_one(&self.pool)
        .await?;

        Ok(FandomId(id))
    }

    async fn update(&self, id: FandomId, update: UpdateFandom) -> DbResult<()> {
        sqlx::query(
            "UPDATE fandoms SET edited_by = $1, title = $3, description = $4, avatar = $5 \
             WHERE id = $2",
        )
        .bind(update.edited_by.0)
        .bind(id.0)
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.avatar)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn history(&self, id: FandomId) -> DbResult<Vec<FandomRow>> {
        let rows = sqlx::query_as::<_, FandomRow>(
            "SELECT id, url, title, description, avatar, created_at \
             FROM fandoms_history($1) ORDER BY edited_at DESC",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
