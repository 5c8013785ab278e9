//! PostgreSQL access-check repository implementation
//!
//! EXISTS probes over the admin, grant, ban and ownership tables. The
//! per-flag grant queries are a static table keyed by the flag enum; no
//! SQL is assembled at runtime.

use async_trait::async_trait;
use sqlx::PgPool;

use fanhall_types::{BlogFlag, BlogId, FandomFlag, FandomId, UserId};

use crate::error::DbResult;
use crate::repo::AccessCheckRepository;

/// Static query for a fandom grant probe, optionally requiring a flag
fn fandom_moder_sql(flag: Option<FandomFlag>) -> &'static str {
    const BASE: &str =
        "SELECT EXISTS (SELECT 1 FROM fandom_moders WHERE user_id = $1 AND target_id = $2)";
    match flag {
        None => BASE,
        Some(FandomFlag::EditF) => {
            "SELECT EXISTS (SELECT 1 FROM fandom_moders \
             WHERE user_id = $1 AND target_id = $2 AND edit_f)"
        }
        Some(FandomFlag::ManageF) => {
            "SELECT EXISTS (SELECT 1 FROM fandom_moders \
             WHERE user_id = $1 AND target_id = $2 AND manage_f)"
        }
        Some(FandomFlag::BanF) => {
            "SELECT EXISTS (SELECT 1 FROM fandom_moders \
             WHERE user_id = $1 AND target_id = $2 AND ban_f)"
        }
        Some(FandomFlag::CreateB) => {
            "SELECT EXISTS (SELECT 1 FROM fandom_moders \
             WHERE user_id = $1 AND target_id = $2 AND create_b)"
        }
        Some(FandomFlag::EditB) => {
            "SELECT EXISTS (SELECT 1 FROM fandom_moders \
             WHERE user_id = $1 AND target_id = $2 AND edit_b)"
        }
        Some(FandomFlag::EditP) => {
            "SELECT EXISTS (SELECT 1 FROM fandom_moders \
             WHERE user_id = $1 AND target_id = $2 AND edit_p)"
        }
        Some(FandomFlag::EditC) => {
            "SELECT EXISTS (SELECT 1 FROM fandom_moders \
             WHERE user_id = $1 AND target_id = $2 AND edit_c)"
        }
    }
}

/// Static query for a blog grant probe, optionally requiring a flag
fn blog_moder_sql(flag: Option<BlogFlag>) -> &'static str {
    const BASE: &str =
        "SELECT EXISTS (SELECT 1 FROM blog_moders WHERE user_id = $1 AND target_id = $2)";
    match flag {
        None => BASE,
        Some(BlogFlag::EditB) => {
            "SELECT EXISTS (SELECT 1 FROM blog_moders \
             WHERE user_id = $1 AND target_id = $2 AND edit_b)"
        }
        Some(BlogFlag::ManageB) => {
            "SELECT EXISTS (SELECT 1 FROM blog_moders \
             WHERE user_id = $1 AND target_id = $2 AND manage_b)"
        }
        Some(BlogFlag::BanB) => {
            "SELECT EXISTS (SELECT 1 FROM blog_moders \
             WHERE user_id = $1 AND target_id = $2 AND ban_b)"
        }
        Some(BlogFlag::CreateP) => {
            "SELECT EXISTS (SELECT 1 FROM blog_moders \
             WHERE user_id = $1 AND target_id = $2 AND create_p)"
        }
        Some(BlogFlag::EditP) => {
            "SELECT EXISTS (SELECT 1 FROM blog_moders \
             WHERE user_id = $1 AND target_id = $2 AND edit_p)"
        }
        Some(BlogFlag::EditC) => {
            "SELECT EXISTS (SELECT 1 FROM blog_moders \
             WHERE user_id = $1 AND target_id = $2 AND edit_c)"
        }
    }
}

/// PostgreSQL access-check repository
#[derive(Clone)]
pub struct PgAccessCheckRepository {
    pool: PgPool,
}

impl PgAccessCheckRepository {
    /// Create a new access-check repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, sql: &str, a: i64, b: Option<i64>) -> DbResult<bool> {
        let mut query = sqlx::query_scalar::<_, bool>(sql).bind(a);
        if let Some(b) = b {
            query = query.bind(b);
        }
        Ok(query.fetch_one(&self.pool).await?)
    }
}

#[async_trait]
impl AccessCheckRepository for PgAccessCheckRepository {
    async fn user_exists(&self, user: UserId) -> DbResult<bool> {
        self.exists(
            "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)",
            user.0,
            None,
        )
        .await
    }

    async fn is_admin(&self, user: UserId) -> DbResult<bool> {
        self.exists(
            "SELECT EXISTS (SELECT 1 FROM admins WHERE user_id = $1)",
            user.0,
            None,
        )
        .await
    }

    async fn fandom_moder(
        &self,
        user: UserId,
        fandom: FandomId,
        flag: Option<FandomFlag>,
    ) -> DbResult<bool> {
        self.exists(fandom_moder_sql(flag), user.0, Some(fandom.0)).await
    }

    async fn fandom_banned(&self, user: UserId, fandom: FandomId) -> DbResult<bool> {
        self.exists(
            "SELECT EXISTS (SELECT 1 FROM fandom_bans WHERE user_id = $1 AND target_id = $2)",
            user.0,
            Some(fandom.0),
        )
        .await
    }

    async fn blog_moder(
        &self,
        user: UserId,
        blog: BlogId,
        flag: Option<BlogFlag>,
    ) -> DbResult<bool> {
        self.exists(blog_moder_sql(flag), user.0, Some(blog.0)).await
    }

    async fn blog_banned(&self, user: UserId, blog: BlogId) -> DbResult<bool> {
        self.exists(
            "SELECT EXISTS (SELECT 1 FROM blog_bans WHERE user_id = $1 AND target_id = $2)",
            user.0,
            Some(blog.0),
        )
        .await
    }

    async fn blog_owner(&self, user: UserId, blog: BlogId) -> DbResult<bool> {
        self.exists(
            "SELECT EXISTS (SELECT 1 FROM blogs WHERE owner = $1 AND id = $2)",
            user.0,
            Some(blog.0),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_queries_reference_their_column() {
        for flag in [
            FandomFlag::EditF,
            FandomFlag::ManageF,
            FandomFlag::BanF,
            FandomFlag::CreateB,
            FandomFlag::EditB,
            FandomFlag::EditP,
            FandomFlag::EditC,
        ] {
            assert!(fandom_moder_sql(Some(flag)).contains(flag.column()));
        }
        for flag in [
            BlogFlag::EditB,
            BlogFlag::ManageB,
            BlogFlag::BanB,
            BlogFlag::CreateP,
            BlogFlag::EditP,
            BlogFlag::EditC,
        ] {
            assert!(blog_moder_sql(Some(flag)).contains(flag.column()));
        }
    }

    #[test]
    fn test_flagless_query_has_no_flag_filter() {
        assert!(!fandom_moder_sql(None).contains("AND edit"));
        assert!(!blog_moder_sql(None).contains("AND edit"));
    }
}
