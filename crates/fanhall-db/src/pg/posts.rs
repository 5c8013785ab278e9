//! PostgreSQL post repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use fanhall_types::{BlogId, FandomId, PostId, UserId};

use crate::error::DbResult;
use crate::models::{PostRow, VoteRow};
use crate::repo::{CreatePost, PostRepository, UpdatePost};

/// PostgreSQL post repository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new post repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn list(&self) -> DbResult<Vec<PostRow>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, blog_id, fandom_id, owner, title, content, created_at \
             FROM posts ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_blog(&self, blog: BlogId) -> DbResult<Vec<PostRow>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, blog_id, fandom_id, owner, title, content, created_at \
             FROM posts WHERE blog_id = $1 ORDER BY id ASC",
        )
        .bind(blog.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_fandom(&self, fandom: FandomId) -> DbResult<Vec<PostRow>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, blog_id, fandom_id, owner, title, content, created_at \
             FROM posts WHERE fandom_id = $1 ORDER BY id ASC",
        )
        .bind(fandom.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_owner(&self, owner: UserId) -> DbResult<Vec<PostRow>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, blog_id, fandom_id, owner, title, content, created_at \
             FROM posts WHERE owner = $1 ORDER BY id ASC",
        )
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: PostId) -> DbResult<Option<PostRow>> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, blog_id, fandom_id, owner, title, content, created_at \
             FROM posts WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, post: CreatePost) -> DbResult<PostId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (blog_id, fandom_id, owner, title, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(post.blog_id.0)
        .bind(post.fandom_id.0)
        .bind(post.owner.0)
        .bind(&post.title)
        .bind(&post.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(PostId(id))
    }

    async fn update(&self, id: PostId, update: UpdatePost) -> DbResult<()> {
        sqlx::query("UPDATE posts SET edited_by = $1, title = $3, content = $4 WHERE id = $2")
            .bind(update.edited_by.0)
            .bind(id.0)
            .bind(&update.title)
            .bind(&update.content)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn history(&self, id: PostId) -> DbResult<Vec<PostRow>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, blog_id, fandom_id, owner, title, content, created_at \
             FROM posts_history($1) ORDER BY edited_at DESC",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn votes(&self, post: PostId) -> DbResult<Vec<VoteRow>> {
        let rows = sqlx::query_as::<_, VoteRow>(
            "SELECT user_id, vote FROM posts_votes WHERE target_id = $1 ORDER BY user_id ASC",
        )
        .bind(post.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_vote(&self, post: PostId, user: UserId) -> DbResult<Option<VoteRow>> {
        let row = sqlx::query_as::<_, VoteRow>(
            "SELECT user_id, vote FROM posts_votes WHERE target_id = $1 AND user_id = $2",
        )
        .bind(post.0)
        .bind(user.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn upsert_vote(&self, post: PostId, user: UserId, vote: bool) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts_votes (user_id, target_id, vote)
            VALUES ($1, $2, $3)
            ON CONFLICT (target_id, user_id) DO UPDATE SET vote = EXCLUDED.vote
            "#,
        )
        .bind(user.0)
        .bind(post.0)
        .bind(vote)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
