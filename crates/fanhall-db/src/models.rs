//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Credential row from the `auth` view: the columns needed to log an
/// account in or rotate its revocation nonce. Never exposed over the API.
#[derive(Debug, Clone, FromRow)]
pub struct CredentialRow {
    pub id: i64,
    pub password_hash: String,
    /// Per-account revocation nonce embedded in refresh tokens
    pub nonce: Uuid,
}

/// Public user row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fandom (community) row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FandomRow {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Blog row. `owner` and `fandom_id` are immutable after creation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlogRow {
    pub id: i64,
    pub fandom_id: i64,
    pub owner: i64,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Post row. Carries both parent scopes for permission checks.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostRow {
    pub id: i64,
    pub blog_id: i64,
    pub fandom_id: i64,
    pub owner: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment row. `parent_id` is set for answers to another comment.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub blog_id: i64,
    pub fandom_id: i64,
    pub owner: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Fandom moderation grant row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FandomModerRow {
    pub user_id: i64,
    pub fandom_id: i64,
    pub set_by: i64,
    pub edit_f: bool,
    pub manage_f: bool,
    pub ban_f: bool,
    pub create_b: bool,
    pub edit_b: bool,
    pub edit_p: bool,
    pub edit_c: bool,
}

/// Fandom ban row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FandomBanRow {
    pub user_id: i64,
    pub fandom_id: i64,
    pub set_by: i64,
    pub reason: String,
}

/// Blog moderation grant row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlogModerRow {
    pub user_id: i64,
    pub blog_id: i64,
    pub set_by: i64,
    pub edit_b: bool,
    pub manage_b: bool,
    pub ban_b: bool,
    pub create_p: bool,
    pub edit_p: bool,
    pub edit_c: bool,
}

/// Blog ban row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlogBanRow {
    pub user_id: i64,
    pub blog_id: i64,
    pub set_by: i64,
    pub reason: String,
}

/// A single up/down vote on a post or comment
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VoteRow {
    pub user_id: i64,
    pub vote: bool,
}
