//! PostgreSQL comment repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use fanhall_types::{BlogId, CommentId, FandomId, PostId, UserId};

use crate::error::DbResult;
use crate::models::{CommentRow, VoteRow};
use crate::repo::{CommentRepository, CreateComment, UpdateComment};

/// PostgreSQL comment repository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    /// Create a new comment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn list(&self) -> DbResult<Vec<CommentRow>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT id, post_id, blog_id, fandom_id, owner, parent_id, content, created_at \
             FROM comments ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_post(&self, post: PostId) -> DbResult<Vec<CommentRow>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT id, post_id, blog_id, fandom_id, owner, parent_id, content, created_at \
             FROM comments WHERE post_id = $1 ORDER BY id ASC",
        )
        .bind(post.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_blog(&self, blog: BlogId) -> DbResult<Vec<CommentRow>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT id, post_id, blog_id, fandom_id, owner, parent_id, content, created_at \
             FROM comments WHERE blog_id = $1 ORDER BY id ASC",
        )
        .bind(blog.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_fandom(&self, fandom: FandomId) -> DbResult<Vec<CommentRow>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT id, post_id, blog_id, fandom_id, owner, parent_id, content, created_at \
             FROM comments WHERE fandom_id = $1 ORDER BY id ASC",
        )
        .bind(fandom.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_owner(&self, owner: UserId) -> DbResult<Vec<CommentRow>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT id, post_id, blog_id, fandom_id, owner, parent_id, content, created_at \
             FROM comments WHERE owner = $1 ORDER BY id ASC",
        )
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn answers(&self, parent: CommentId) -> DbResult<Vec<CommentRow>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT id, post_id, blog_id, fandom_id, owner, parent_id, content, created_at \
             FROM comments WHERE parent_id = $1 ORDER BY id ASC",
        )
        .bind(parent.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: CommentId) -> DbResult<Option<CommentRow>> {
        let row = sqlx::query_as::<_, CommentRow>(
            "SELECT id, post_id, blog_id, fandom_id, owner, parent_id, content, created_at \
             FROM comments WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, comment: CreateComment) -> DbResult<CommentId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO comments (post_id, blog_id, fandom_id, owner, parent_id, content)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(comment.post_id.0)
        .bind(comment.blog_id.0)
        .bind(comment.fandom_id.0)
        .bind(comment.owner.0)
        .bind(comment.parent_id.map(|id| id.0))
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(CommentId(id))
    }

    async fn update(&self, id: CommentId, update: UpdateComment) -> DbResult<()> {
        sqlx::query("UPDATE comments SET edited_by = $1, content = $3 WHERE id = $2")
            .bind(update.edited_by.0)
            .bind(id.0)
            .bind(&update.content)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn history(&self, id: CommentId) -> DbResult<Vec<CommentRow>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            "SELECT id, post_id, blog_id, fandom_id, owner, parent_id, content, created_at \
             FROM comments_history($1) ORDER BY edited_at DESC",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn votes(&self, comment: CommentId) -> DbResult<Vec<VoteRow>> {
        let rows = sqlx::query_as::<_, VoteRow>(
            "SELECT user_id, vote FROM comment_votes WHERE target_id = $1 ORDER BY user_id ASC",
        )
        .bind(comment.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_vote(&self, comment: CommentId, user: UserId) -> DbResult<Option<VoteRow>> {
        let row = sqlx::query_as::<_, VoteRow>(
            "SELECT user_id, vote FROM comment_votes WHERE target_id = $1 AND user_id = $2",
        )
        .bind(comment.0)
        .bind(user.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn upsert_vote(&self, comment: CommentId, user: UserId, vote: bool) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comment_votes (user_id, target_id, vote)
            VALUES ($1, $2, $3)
            ON CONFLICT (target_id, user_id) DO UPDATE SET vote = EXCLUDED.vote
            "#,
        )
        .bind(user.0)
        .bind(comment.0)
        .bind(vote)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
