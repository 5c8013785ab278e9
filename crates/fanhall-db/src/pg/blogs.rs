//! PostgreSQL blog repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use fanhall_types::{BlogId, FandomId, UserId};

use crate::error::DbResult;
use crate::models::BlogRow;
use crate::repo::{BlogRepository, CreateBlog, UpdateBlog};

/// PostgreSQL blog repository
#[derive(Clone)]
pub struct PgBlogRepository {
    pool: PgPool,
}

impl PgBlogRepository {
    /// Create a new blog repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogRepository for PgBlogRepository {
    async fn list(&self) -> DbResult<Vec<BlogRow>> {
        let rows = sqlx::query_as::<_, BlogRow>(
            "SELECT id, fandom_id, owner, url, title, description, avatar, created_at \
             FROM blogs ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_fandom(&self, fandom: FandomId) -> DbResult<Vec<BlogRow>> {
        let rows = sqlx::query_as::<_, BlogRow>(
            "SELECT id, fandom_id, owner, url, title, description, avatar, created_at \
             FROM blogs WHERE fandom_id = $1 ORDER BY id ASC",
        )
        .bind(fandom.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_owner(&self, owner: UserId) -> DbResult<Vec<BlogRow>> {
        let rows = sqlx::query_as::<_, BlogRow>(
            "SELECT id, fandom_id, owner, url, title, description, avatar, created_at \
             FROM blogs WHERE owner = $1 ORDER BY id ASC",
        )
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: BlogId) -> DbResult<Option<BlogRow>> {
        let row = sqlx::query_as::<_, BlogRow>(
            "SELECT id, fandom_id, owner, url, title, description, avatar, created_at \
             FROM blogs WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_url(&self, fandom: FandomId, url: &str) -> DbResult<Option<BlogRow>> {
        let row = sqlx::query_as::<_, BlogRow>(
            "SELECT id, fandom_id, owner, url, title, description, avatar, created_at \
             FROM blogs WHERE fandom_id = $1 AND url = $2::CITEXT",
        )
        .bind(fandom.0)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, blog: CreateBlog) -> DbResult<BlogId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO blogs (fandom_id, owner, url, title, description, avatar)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(blog.fandom_id.0)
        .bind(blog.owner.0)
        .bind(&blog.url)
        .bind(&blog.title)
        .bind(&blog.description)
        .bind(&blog.avatar)
        .fetch_one(&self.pool)
        .await?;

        Ok(BlogId(id))
    }

    async fn update(&self, id: BlogId, update: UpdateBlog) -> DbResult<()> {
        sqlx::query(
            "UPDATE blogs SET edited_by = $1, title = $3, description = $4, avatar = $5 \
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

    async fn history(&self, id: BlogId) -> DbResult<Vec<BlogRow>> {
        let rows = sqlx::query_as::<_, BlogRow>(
            "SELECT id, fandom_id, owner, url, title, description, avatar, created_at \
             FROM blogs_history($1) ORDER BY edited_at DESC",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
