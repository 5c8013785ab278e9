//! Blog endpoints: the blogs themselves, their moderator roster, bans
//! and content listings

use axum::extract::{Path, State};
use serde::Deserialize;
use std::collections::HashMap;

use fanhall_auth_core::{authorize, AuthError};
use fanhall_db::{
    BlogBan, BlogBanRow, BlogGrant, BlogModerRow, BlogRepository, BlogRow, CommentRepository,
    CommentRow, CreatePost, ModerationRepository, PostRepository, PostRow, UpdateBlog,
};
use fanhall_types::{BlogId, FandomId, UserId};

use crate::error::ApiResult;
use crate::extractors::{Body, Principal};
use crate::handlers::{numeric_param, require_len};
use crate::locator::locate_blog;
use crate::response::{Created, Data};
use crate::state::AppState;

async fn blog_from_path(
    state: &AppState,
    params: &HashMap<String, String>,
) -> ApiResult<BlogRow> {
    let id = BlogId(numeric_param(params, "blog")?);
    locate_blog(&state.repos.blogs, id).await
}

/// GET /blogs
pub async fn list(State(state): State<AppState>) -> ApiResult<Data<Vec<BlogRow>>> {
    Ok(Data(state.repos.blogs.list().await?))
}

/// GET /blogs/{blog}
pub async fn get(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<BlogRow>> {
    Ok(Data(blog_from_path(&state, &params).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
}

/// PATCH /blogs/{blog}
pub async fn update(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<UpdateBlogRequest>,
) -> ApiResult<Data<()>> {
    require_len("title", &req.title, 1, 128)?;

    let blog = blog_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_edit_blog(
                principal,
                BlogId(blog.id),
                FandomId(blog.fandom_id),
                UserId(blog.owner),
            )
            .await?,
    )?;

    state
        .repos
        .blogs
        .update(
            BlogId(blog.id),
            UpdateBlog {
                title: req.title,
                description: req.description,
                avatar: req.avatar,
                edited_by: principal,
            },
        )
        .await?;

    Ok(Data(()))
}

/// GET /blogs/{blog}/history
pub async fn history(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<BlogRow>>> {
    let blog = blog_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_edit_blog(
                principal,
                BlogId(blog.id),
                FandomId(blog.fandom_id),
                UserId(blog.owner),
            )
            .await?,
    )?;

    Ok(Data(state.repos.blogs.history(BlogId(blog.id)).await?))
}

// ============================================================================
// Moderators
// ============================================================================

/// GET /blogs/{blog}/moders
pub async fn moders_list(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<BlogModerRow>>> {
    let blog = blog_from_path(&state, &params).await?;

    Ok(Data(
        state
            .repos
            .moderation
            .list_blog_moders(BlogId(blog.id))
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct BlogModerRequest {
    pub user_id: i64,
    pub edit_b: bool,
    pub manage_b: bool,
    pub ban_b: bool,
    pub create_p: bool,
    pub edit_p: bool,
    pub edit_c: bool,
}

impl BlogModerRequest {
    fn into_grant(self, blog: BlogId, set_by: UserId) -> BlogGrant {
        BlogGrant {
            user_id: UserId(self.user_id),
            blog_id: blog,
            set_by,
            edit_b: self.edit_b,
            manage_b: self.manage_b,
            ban_b: self.ban_b,
            create_p: self.create_p,
            edit_p: self.edit_p,
            edit_c: self.edit_c,
        }
    }
}

/// POST /blogs/{blog}/moders
pub async fn moders_create(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<BlogModerRequest>,
) -> ApiResult<Created> {
    let blog = blog_from_path(&state, &params).await?;
    let user_id = req.user_id;

    state
        .guard
        .grant_blog_moder(
            principal,
            FandomId(blog.fandom_id),
            req.into_grant(BlogId(blog.id), principal),
        )
        .await?;

    Ok(Created::at(format!("/blogs/{}/moders/{user_id}", blog.id)))
}

/// GET /blogs/{blog}/moders/{moder}
pub async fn moders_get(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<BlogModerRow>> {
    let blog = blog_from_path(&state, &params).await?;
    let moder = UserId(numeric_param(&params, "moder")?);

    state
        .repos
        .moderation
        .find_blog_moder(BlogId(blog.id), moder)
        .await?
        .map(Data)
        .ok_or_else(|| AuthError::ObjectNotFound.into())
}

/// PATCH /blogs/{blog}/moders/{moder}
pub async fn moders_update(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<BlogModerRequest>,
) -> ApiResult<Data<()>> {
    let blog = blog_from_path(&state, &params).await?;
    let moder = UserId(numeric_param(&params, "moder")?);

    let mut grant = req.into_grant(BlogId(blog.id), principal);
    grant.user_id = moder;
    state.guard.update_blog_moder(principal, grant).await?;

    Ok(Data(()))
}

/// DELETE /blogs/{blog}/moders/{moder}
pub async fn moders_delete(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<()>> {
    let blog = blog_from_path(&state, &params).await?;
    let moder = UserId(numeric_param(&params, "moder")?);

    state
        .guard
        .revoke_blog_moder(principal, BlogId(blog.id), moder)
        .await?;

    Ok(Data(()))
}

// ============================================================================
// Bans
// ============================================================================

/// GET /blogs/{blog}/bans
pub async fn bans_list(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<BlogBanRow>>> {
    let blog = blog_from_path(&state, &params).await?;

    Ok(Data(
        state
            .repos
            .moderation
            .list_blog_bans(BlogId(blog.id))
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct BanRequest {
    pub user_id: i64,
    pub reason: String,
}

/// POST /blogs/{blog}/bans
pub async fn bans_create(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<BanRequest>,
) -> ApiResult<Created> {
    require_len("reason", &req.reason, 1, 512)?;

    let blog = blog_from_path(&state, &params).await?;

    state
        .guard
        .ban_blog_user(
            principal,
            FandomId(blog.fandom_id),
            BlogBan {
                user_id: UserId(req.user_id),
                blog_id: BlogId(blog.id),
                set_by: principal,
                reason: req.reason,
            },
        )
        .await?;

    Ok(Created::at(format!("/blogs/{}/bans/{}", blog.id, req.user_id)))
}

/// GET /blogs/{blog}/bans/{banned}
pub async fn bans_get(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<BlogBanRow>> {
    let blog = blog_from_path(&state, &params).await?;
    let banned = UserId(numeric_param(&params, "banned")?);

    state
        .repos
        .moderation
        .find_blog_ban(BlogId(blog.id), banned)
        .await?
        .map(Data)
        .ok_or_else(|| AuthError::ObjectNotFound.into())
}

/// DELETE /blogs/{blog}/bans/{banned}
pub async fn bans_delete(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<()>> {
    let blog = blog_from_path(&state, &params).await?;
    let banned = UserId(numeric_param(&params, "banned")?);

    state
        .guard
        .lift_blog_ban(principal, BlogId(blog.id), banned)
        .await?;

    Ok(Data(()))
}

// ============================================================================
// Content
// ============================================================================

/// GET /blogs/{blog}/posts
pub async fn posts_list(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<PostRow>>> {
    let blog = blog_from_path(&state, &params).await?;

    Ok(Data(state.repos.posts.list_by_blog(BlogId(blog.id)).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// POST /blogs/{blog}/posts
pub async fn posts_create(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<CreatePostRequest>,
) -> ApiResult<Created> {
    require_len("title", &req.title, 1, 256)?;
    require_len("content", &req.content, 1, 65536)?;

    let blog = blog_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_publish(principal, BlogId(blog.id), FandomId(blog.fandom_id))
            .await?,
    )?;

    let id = state
        .repos
        .posts
        .create(CreatePost {
            blog_id: BlogId(blog.id),
            fandom_id: FandomId(blog.fandom_id),
            owner: principal,
            title: req.title,
            content: req.content,
        })
        .await?;

    Ok(Created::at(format!("/posts/{id}")))
}

/// GET /blogs/{blog}/comments
pub async fn comments_list(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<CommentRow>>> {
    let blog = blog_from_path(&state, &params).await?;

    Ok(Data(
        state.repos.comments.list_by_blog(BlogId(blog.id)).await?,
    ))
}
