//! PostgreSQL moderation repository implementation
//!
//! Grant and ban tables are unique on (user_id, target_id); violations
//! bubble up as `DbError::UniqueViolation` for the guard layer to
//! translate.

use async_trait::async_trait;
use sqlx::PgPool;

use fanhall_types::{BlogId, FandomId, UserId};

use crate::error::DbResult;
use crate::models::{BlogBanRow, BlogModerRow, FandomBanRow, FandomModerRow};
use crate::repo::{BlogBan, BlogGrant, FandomBan, FandomGrant, ModerationRepository};

/// PostgreSQL moderation repository
#[derive(Clone)]
pub struct PgModerationRepository {
    pool: PgPool,
}

impl PgModerationRepository {
    /// Create a new moderation repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModerationRepository for PgModerationRepository {
    async fn list_fandom_moders(&self, fandom: FandomId) -> DbResult<Vec<FandomModerRow>> {
        let rows = sqlx::query_as::<_, FandomModerRow>(
            r#"
            SELECT user_id, target_id AS fandom_id, set_by,
                   edit_f, manage_f, ban_f, create_b, edit_b, edit_p, edit_c
            FROM fandom_moders
            WHERE target_id = $1
            ORDER BY user_id ASC
            "#,
        )
        .bind(fandom.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_fandom_moder(
        &self,
        fandom: FandomId,
        user: UserId,
    ) -> DbResult<Option<FandomModerRow>> {
        let row = sqlx::query_as::<_, FandomModerRow>(
            r#"
            SELECT user_id, target_id AS fandom_id, set_by,
                   edit_f, manage_f, ban_f, create_b, edit_b, edit_p, edit_c
            FROM fandom_moders
            WHERE target_id = $1 AND user_id = $2
            "#,
        )
        .bind(fandom.0)
        .bind(user.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_fandom_moder(&self, grant: FandomGrant) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO fandom_moders
                (user_id, target_id, set_by,
                 edit_f, manage_f, ban_f, create_b, edit_b, edit_p, edit_c)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(grant.user_id.0)
        .bind(grant.fandom_id.0)
        .bind(grant.set_by.0)
        .bind(grant.edit_f)
        .bind(grant.manage_f)
        .bind(grant.ban_f)
        .bind(grant.create_b)
        .bind(grant.edit_b)
        .bind(grant.edit_p)
        .bind(grant.edit_c)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_fandom_moder(&self, grant: FandomGrant) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE fandom_moders
            SET edit_f = $3, manage_f = $4, ban_f = $5,
                create_b = $6, edit_b = $7, edit_p = $8, edit_c = $9
            WHERE user_id = $1 AND target_id = $2
            "#,
        )
        .bind(grant.user_id.0)
        .bind(grant.fandom_id.0)
        .bind(grant.edit_f)
        .bind(grant.manage_f)
        .bind(grant.ban_f)
        .bind(grant.create_b)
        .bind(grant.edit_b)
        .bind(grant.edit_p)
        .bind(grant.edit_c)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_fandom_moder(&self, fandom: FandomId, user: UserId) -> DbResult<()> {
        sqlx::query("DELETE FROM fandom_moders WHERE user_id = $1 AND target_id = $2")
            .bind(user.0)
            .bind(fandom.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_fandom_bans(&self, fandom: FandomId) -> DbResult<Vec<FandomBanRow>> {
        let rows = sqlx::query_as::<_, FandomBanRow>(
            r#"
            SELECT user_id, target_id AS fandom_id, set_by, reason
            FROM fandom_bans
            WHERE target_id = $1
            ORDER BY user_id ASC
            "#,
        )
        .bind(fandom.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_fandom_ban(
        &self,
        fandom: FandomId,
        user: UserId,
    ) -> DbResult<Option<FandomBanRow>> {
        let row = sqlx::query_as::<_, FandomBanRow>(
            r#"
            SELECT user_id, target_id AS fandom_id, set_by, reason
            FROM fandom_bans
            WHERE target_id = $1 AND user_id = $2
            "#,
        )
        .bind(fandom.0)
        .bind(user.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_fandom_ban(&self, ban: FandomBan) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO fandom_bans (user_id, target_id, set_by, reason)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(ban.user_id.0)
        .bind(ban.fandom_id.0)
        .bind(ban.set_by.0)
        .bind(&ban.reason)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_fandom_ban(&self, fandom: FandomId, user: UserId) -> DbResult<()> {
        sqlx::query("DELETE FROM fandom_bans WHERE user_id = $1 AND target_id = $2")
            .bind(user.0)
            .bind(fandom.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_blog_moders(&self, blog: BlogId) -> DbResult<Vec<BlogModerRow>> {
        let rows = sqlx::query_as::<_, BlogModerRow>(
            r#"
            SELECT user_id, target_id AS blog_id, set_by,
                   edit_b, manage_b, ban_b, create_p, edit_p, edit_c
            FROM blog_moders
            WHERE target_id = $1
            ORDER BY user_id ASC
            "#,
        )
        .bind(blog.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_blog_moder(
        &self,
        blog: BlogId,
        user: UserId,
    ) -> DbResult<Option<BlogModerRow>> {
        let row = sqlx::query_as::<_, BlogModerRow>(
            r#"
            SELECT user_id, target_id AS blog_id, set_by,
                   edit_b, manage_b, ban_b, create_p, edit_p, edit_c
            FROM blog_moders
            WHERE target_id = $1 AND user_id = $2
            "#,
        )
        .bind(blog.0)
        .bind(user.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_blog_moder(&self, grant: BlogGrant) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO blog_moders
                (user_id, target_id, set_by,
                 edit_b, manage_b, ban_b, create_p, edit_p, edit_c)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(grant.user_id.0)
        .bind(grant.blog_id.0)
        .bind(grant.set_by.0)
        .bind(grant.edit_b)
        .bind(grant.manage_b)
        .bind(grant.ban_b)
        .bind(grant.create_p)
        .bind(grant.edit_p)
        .bind(grant.edit_c)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_blog_moder(&self, grant: BlogGrant) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE blog_moders
            SET edit_b = $3, manage_b = $4, ban_b = $5,
                create_p = $6, edit_p = $7, edit_c = $8
            WHERE user_id = $1 AND target_id = $2
            "#,
        )
        .bind(grant.user_id.0)
        .bind(grant.blog_id.0)
        .bind(grant.edit_b)
        .bind(grant.manage_b)
        .bind(grant.ban_b)
        .bind(grant.create_p)
        .bind(grant.edit_p)
        .bind(grant.edit_c)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_blog_moder(&self, blog: BlogId, user: UserId) -> DbResult<()> {
        sqlx::query("DELETE FROM blog_moders WHERE user_id = $1 AND target_id = $2")
            .bind(user.0)
            .bind(blog.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_blog_bans(&self, blog: BlogId) -> DbResult<Vec<BlogBanRow>> {
        let rows = sqlx::query_as::<_, BlogBanRow>(
            r#"
            SELECT user_id, target_id AS blog_id, set_by, reason
            FROM blog_bans
            WHERE target_id = $1
            ORDER BY user_id ASC
            "#,
        )
        .bind(blog.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_blog_ban(&self, blog: BlogId, user: UserId) -> DbResult<Option<BlogBanRow>> {
        let row = sqlx::query_as::<_, BlogBanRow>(
            r#"
            SELECT user_id, target_id AS blog_id, set_by, reason
            FROM blog_bans
            WHERE target_id = $1 AND user_id = $2
            "#,
        )
        .bind(blog.0)
        .bind(user.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_blog_ban(&self, ban: BlogBan) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO blog_bans (user_id, target_id, set_by, reason)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(ban.user_id.0)
        .bind(ban.blog_id.0)
        .bind(ban.set_by.0)
        .bind(&ban.reason)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_blog_ban(&self, blog: BlogId, user: UserId) -> DbResult<()> {
        sqlx::query("DELETE FROM blog_bans WHERE user_id = $1 AND target_id = $2")
            .bind(user.0)
            .bind(blog.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
