//! Post endpoints: the posts themselves, votes and their comments

use axum::extract::{Path, State};
use serde::Deserialize;
use std::collections::HashMap;

use fanhall_auth_core::authorize;
use fanhall_db::{
    CommentRepository, CommentRow, CreateComment, PostRepository, PostRow, UpdatePost, VoteRow,
};
use fanhall_types::{BlogId, FandomId, PostId, UserId};

use crate::error::ApiResult;
use crate::extractors::{Body, Principal};
use crate::handlers::{numeric_param, require_len};
use crate::locator::locate_post;
use crate::response::{Created, Data};
use crate::state::AppState;

async fn post_from_path(
    state: &AppState,
    params: &HashMap<String, String>,
) -> ApiResult<PostRow> {
    let id = PostId(numeric_param(params, "post")?);
    locate_post(&state.repos.posts, id).await
}

/// GET /posts
pub async fn list(State(state): State<AppState>) -> ApiResult<Data<Vec<PostRow>>> {
    Ok(Data(state.repos.posts.list().await?))
}

/// GET /posts/{post}
pub async fn get(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<PostRow>> {
    Ok(Data(post_from_path(&state, &params).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
}

/// PATCH /posts/{post}
pub async fn update(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<UpdatePostRequest>,
) -> ApiResult<Data<()>> {
    require_len("title", &req.title, 1, 256)?;
    require_len("content", &req.content, 1, 65536)?;

    let post = post_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_edit_post(
                principal,
                UserId(post.owner),
                BlogId(post.blog_id),
                FandomId(post.fandom_id),
            )
            .await?,
    )?;

    state
        .repos
        .posts
        .update(
            PostId(post.id),
            UpdatePost {
                title: req.title,
                content: req.content,
                edited_by: principal,
            },
        )
        .await?;

    Ok(Data(()))
}

/// GET /posts/{post}/history
pub async fn history(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<PostRow>>> {
    let post = post_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_edit_post(
                principal,
                UserId(post.owner),
                BlogId(post.blog_id),
                FandomId(post.fandom_id),
            )
            .await?,
    )?;

    Ok(Data(state.repos.posts.history(PostId(post.id)).await?))
}

/// GET /posts/{post}/votes
///
/// Admins see every voter; everyone else sees at most their own vote.
pub async fn votes_list(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<VoteRow>>> {
    let post = post_from_path(&state, &params).await?;

    if state.resolver.can_view_votes(principal).await? {
        return Ok(Data(state.repos.posts.votes(PostId(post.id)).await?));
    }

    if principal.is_anonymous() {
        return Ok(Data(Vec::new()));
    }
    let own = state
        .repos
        .posts
        .find_vote(PostId(post.id), principal)
        .await?;
    Ok(Data(own.into_iter().collect()))
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote: bool,
}

/// PUT /posts/{post}/votes
pub async fn votes_put(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<VoteRequest>,
) -> ApiResult<Data<()>> {
    let post = post_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_publish(principal, BlogId(post.blog_id), FandomId(post.fandom_id))
            .await?,
    )?;

    state
        .repos
        .posts
        .upsert_vote(PostId(post.id), principal, req.vote)
        .await?;

    Ok(Data(()))
}

/// GET /posts/{post}/comments
pub async fn comments_list(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<CommentRow>>> {
    let post = post_from_path(&state, &params).await?;

    Ok(Data(
        state.repos.comments.list_by_post(PostId(post.id)).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub parent_id: Option<i64>,
}

/// POST /posts/{post}/comments
pub async fn comments_create(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<CreateCommentRequest>,
) -> ApiResult<Created> {
    require_len("content", &req.content, 1, 8192)?;

    let post = post_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_publish(principal, BlogId(post.blog_id), FandomId(post.fandom_id))
            .await?,
    )?;

    let id = state
        .repos
        .comments
        .create(CreateComment {
            post_id: PostId(post.id),
            blog_id: BlogId(post.blog_id),
            fandom_id: FandomId(post.fandom_id),
            owner: principal,
            parent_id: req.parent_id.map(fanhall_types::CommentId),
            content: req.content,
        })
        .await?;

    Ok(Created::at(format!("/comments/{id}")))
}
