//! Repository traits
//!
//! Define async repository interfaces for database operations. The core
//! services are generic over these traits; the `pg` module provides the
//! PostgreSQL implementations and the test suites provide in-memory
//! mocks.

use async_trait::async_trait;
use uuid::Uuid;

use fanhall_types::{BlogFlag, BlogId, CommentId, FandomFlag, FandomId, PostId, UserId};

use crate::error::DbResult;
use crate::models::*;

// ============================================================================
// Credentials
// ============================================================================

/// Create account input
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub username: String,
    pub password_hash: String,
}

/// Credential repository trait
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Insert a new account, returning its id.
    ///
    /// A uniqueness conflict on the username surfaces as
    /// `DbError::UniqueViolation`.
    async fn create_account(&self, account: CreateAccount) -> DbResult<UserId>;

    /// Look up login credentials by case-insensitive username
    async fn find_by_username(&self, username: &str) -> DbResult<Option<CredentialRow>>;

    /// Current revocation nonce for an account
    async fn nonce(&self, id: UserId) -> DbResult<Option<Uuid>>;

    /// Regenerate the revocation nonce
    async fn rotate_nonce(&self, id: UserId) -> DbResult<()>;

    /// Replace the password hash
    async fn set_password(&self, id: UserId, password_hash: &str) -> DbResult<()>;

    /// Rotate the nonce and replace the password hash in one atomic row
    /// update, so a concurrent login with the old password cannot observe
    /// the new hash with the old nonce or vice versa.
    async fn rotate_nonce_and_set_password(&self, id: UserId, password_hash: &str)
        -> DbResult<()>;
}

// ============================================================================
// Access checks
// ============================================================================

/// Pure existence probes used by the permission resolver. Each call is a
/// single round trip; results are never cached.
#[async_trait]
pub trait AccessCheckRepository: Send + Sync {
    /// Does the account exist
    async fn user_exists(&self, user: UserId) -> DbResult<bool>;

    /// Is the account a site admin
    async fn is_admin(&self, user: UserId) -> DbResult<bool>;

    /// Does the account hold a fandom grant, optionally with a flag set
    async fn fandom_moder(
        &self,
        user: UserId,
        fandom: FandomId,
        flag: Option<FandomFlag>,
    ) -> DbResult<bool>;

    /// Is the account banned at fandom scope
    async fn fandom_banned(&self, user: UserId, fandom: FandomId) -> DbResult<bool>;

    /// Does the account hold a blog grant, optionally with a flag set
    async fn blog_moder(&self, user: UserId, blog: BlogId, flag: Option<BlogFlag>)
        -> DbResult<bool>;

    /// Is the account banned at blog scope
    async fn blog_banned(&self, user: UserId, blog: BlogId) -> DbResult<bool>;

    /// Does the account own the blog
    async fn blog_owner(&self, user: UserId, blog: BlogId) -> DbResult<bool>;
}

// ============================================================================
// Moderation grants and bans
// ============================================================================

/// Fandom grant input (insert and update share the full flag set)
#[derive(Debug, Clone)]
pub struct FandomGrant {
    pub user_id: UserId,
    pub fandom_id: FandomId,
    pub set_by: UserId,
    pub edit_f: bool,
    pub manage_f: bool,
    pub ban_f: bool,
    pub create_b: bool,
    pub edit_b: bool,
    pub edit_p: bool,
    pub edit_c: bool,
}

/// Blog grant input
#[derive(Debug, Clone)]
pub struct BlogGrant {
    pub user_id: UserId,
    pub blog_id: BlogId,
    pub set_by: UserId,
    pub edit_b: bool,
    pub manage_b: bool,
    pub ban_b: bool,
    pub create_p: bool,
    pub edit_p: bool,
    pub edit_c: bool,
}

/// Fandom ban input
#[derive(Debug, Clone)]
pub struct FandomBan {
    pub user_id: UserId,
    pub fandom_id: FandomId,
    pub set_by: UserId,
    pub reason: String,
}

/// Blog ban input
#[derive(Debug, Clone)]
pub struct BlogBan {
    pub user_id: UserId,
    pub blog_id: BlogId,
    pub set_by: UserId,
    pub reason: String,
}

/// Moderation grant/ban storage. Inserts surface uniqueness conflicts as
/// `DbError::UniqueViolation`; the guard layer translates those into the
/// matching domain conflicts.
#[async_trait]
pub trait ModerationRepository: Send + Sync {
    async fn list_fandom_moders(&self, fandom: FandomId) -> DbResult<Vec<FandomModerRow>>;
    async fn find_fandom_moder(
        &self,
        fandom: FandomId,
        user: UserId,
    ) -> DbResult<Option<FandomModerRow>>;
    async fn insert_fandom_moder(&self, grant: FandomGrant) -> DbResult<()>;
    async fn update_fandom_moder(&self, grant: FandomGrant) -> DbResult<()>;
    async fn delete_fandom_moder(&self, fandom: FandomId, user: UserId) -> DbResult<()>;

    async fn list_fandom_bans(&self, fandom: FandomId) -> DbResult<Vec<FandomBanRow>>;
    async fn find_fandom_ban(
        &self,
        fandom: FandomId,
        user: UserId,
    ) -> DbResult<Option<FandomBanRow>>;
    async fn insert_fandom_ban(&self, ban: FandomBan) -> DbResult<()>;
    async fn delete_fandom_ban(&self, fandom: FandomId, user: UserId) -> DbResult<()>;

    async fn list_blog_moders(&self, blog: BlogId) -> DbResult<Vec<BlogModerRow>>;
    async fn find_blog_moder(&self, blog: BlogId, user: UserId)
        -> DbResult<Option<BlogModerRow>>;
    async fn insert_blog_moder(&self, grant: BlogGrant) -> DbResult<()>;
    async fn update_blog_moder(&self, grant: BlogGrant) -> DbResult<()>;
    async fn delete_blog_moder(&self, blog: BlogId, user: UserId) -> DbResult<()>;

    async fn list_blog_bans(&self, blog: BlogId) -> DbResult<Vec<BlogBanRow>>;
    async fn find_blog_ban(&self, blog: BlogId, user: UserId) -> DbResult<Option<BlogBanRow>>;
    async fn insert_blog_ban(&self, ban: BlogBan) -> DbResult<()>;
    async fn delete_blog_ban(&self, blog: BlogId, user: UserId) -> DbResult<()>;
}

// ============================================================================
// Content
// ============================================================================

/// Profile update input
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub edited_by: UserId,
}

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> DbResult<Vec<UserRow>>;
    async fn find_by_id(&self, id: UserId) -> DbResult<Option<UserRow>>;
    async fn find_by_username(&self, username: &str) -> DbResult<Option<UserRow>>;
    async fn update_profile(&self, id: UserId, update: UpdateProfile) -> DbResult<()>;
    async fn history(&self, id: UserId) -> DbResult<Vec<UserRow>>;
}

/// Create fandom input
#[derive(Debug, Clone)]
pub struct CreateFandom {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub created_by: UserId,
}

/// Fandom update input
#[derive(Debug, Clone)]
pub struct UpdateFandom {
    pub title: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub edited_by: UserId,
}

/// Fandom repository trait
#[async_trait]
pub trait FandomRepository: Send + Sync {
    async fn list(&self) -> DbResult<Vec<FandomRow>>;
    async fn find_by_id(&self, id: FandomId) -> DbResult<Option<FandomRow>>;
    async fn find_by_url(&self, url: &str) -> DbResult<Option<FandomRow>>;
    /// Uniqueness conflict on the url surfaces as `DbError::UniqueViolation`
    async fn create(&self, fandom: CreateFandom) -> DbResult<FandomId>;
    async fn update(&self, id: FandomId, update: UpdateFandom) -> DbResult<()>;
    async fn history(&self, id: FandomId) -> DbResult<Vec<FandomRow>>;
}

/// Create blog input
#[derive(Debug, Clone)]
pub struct CreateBlog {
    pub fandom_id: FandomId,
    pub owner: UserId,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
}

/// Blog update input
#[derive(Debug, Clone)]
pub struct UpdateBlog {
    pub title: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub edited_by: UserId,
}

/// Blog repository trait
#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn list(&self) -> DbResult<Vec<BlogRow>>;
    async fn list_by_fandom(&self, fandom: FandomId) -> DbResult<Vec<BlogRow>>;
    async fn list_by_owner(&self, owner: UserId) -> DbResult<Vec<BlogRow>>;
    async fn find_by_id(&self, id: BlogId) -> DbResult<Option<BlogRow>>;
    async fn find_by_url(&self, fandom: FandomId, url: &str) -> DbResult<Option<BlogRow>>;
    /// Uniqueness conflict on the url surfaces as `DbError::UniqueViolation`
    async fn create(&self, blog: CreateBlog) -> DbResult<BlogId>;
    async fn update(&self, id: BlogId, update: UpdateBlog) -> DbResult<()>;
    async fn history(&self, id: BlogId) -> DbResult<Vec<BlogRow>>;
}

/// Create post input
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub blog_id: BlogId,
    pub fandom_id: FandomId,
    pub owner: UserId,
    pub title: String,
    pub content: String,
}

/// Post update input
#[derive(Debug, Clone)]
pub struct UpdatePost {
    pub title: String,
    pub content: String,
    pub edited_by: UserId,
}

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn list(&self) -> DbResult<Vec<PostRow>>;
    async fn list_by_blog(&self, blog: BlogId) -> DbResult<Vec<PostRow>>;
    async fn list_by_fandom(&self, fandom: FandomId) -> DbResult<Vec<PostRow>>;
    async fn list_by_owner(&self, owner: UserId) -> DbResult<Vec<PostRow>>;
    async fn find_by_id(&self, id: PostId) -> DbResult<Option<PostRow>>;
    async fn create(&self, post: CreatePost) -> DbResult<PostId>;
    async fn update(&self, id: PostId, update: UpdatePost) -> DbResult<()>;
    async fn history(&self, id: PostId) -> DbResult<Vec<PostRow>>;

    async fn votes(&self, post: PostId) -> DbResult<Vec<VoteRow>>;
    async fn find_vote(&self, post: PostId, user: UserId) -> DbResult<Option<VoteRow>>;
    async fn upsert_vote(&self, post: PostId, user: UserId, vote: bool) -> DbResult<()>;
}

/// Create comment input
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub post_id: PostId,
    pub blog_id: BlogId,
    pub fandom_id: FandomId,
    pub owner: UserId,
    pub parent_id: Option<CommentId>,
    pub content: String,
}

/// Comment update input
#[derive(Debug, Clone)]
pub struct UpdateComment {
    pub content: String,
    pub edited_by: UserId,
}

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn list(&self) -> DbResult<Vec<CommentRow>>;
    async fn list_by_post(&self, post: PostId) -> DbResult<Vec<CommentRow>>;
    async fn list_by_blog(&self, blog: BlogId) -> DbResult<Vec<CommentRow>>;
    async fn list_by_fandom(&self, fandom: FandomId) -> DbResult<Vec<CommentRow>>;
    async fn list_by_owner(&self, owner: UserId) -> DbResult<Vec<CommentRow>>;
    async fn answers(&self, parent: CommentId) -> DbResult<Vec<CommentRow>>;
    async fn find_by_id(&self, id: CommentId) -> DbResult<Option<CommentRow>>;
    async fn create(&self, comment: CreateComment) -> DbResult<CommentId>;
    async fn update(&self, id: CommentId, update: UpdateComment) -> DbResult<()>;
    async fn history(&self, id: CommentId) -> DbResult<Vec<CommentRow>>;

    async fn votes(&self, comment: CommentId) -> DbResult<Vec<VoteRow>>;
    async fn find_vote(&self, comment: CommentId, user: UserId) -> DbResult<Option<VoteRow>>;
    async fn upsert_vote(&self, comment: CommentId, user: UserId, vote: bool) -> DbResult<()>;
}
