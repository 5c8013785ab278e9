//! Comment endpoints: listing with scope narrowing, answers, votes

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use std::collections::HashMap;

use fanhall_auth_core::authorize;
use fanhall_db::{CommentRepository, CommentRow, CreateComment, UpdateComment, VoteRow};
use fanhall_types::{BlogId, CommentId, FandomId, PostId, UserId};

use crate::error::ApiResult;
use crate::extractors::{Body, Principal};
use crate::handlers::{numeric_param, require_len};
use crate::locator::locate_comment;
use crate::response::{Created, Data};
use crate::state::AppState;

async fn comment_from_path(
    state: &AppState,
    params: &HashMap<String, String>,
) -> ApiResult<CommentRow> {
    let id = CommentId(numeric_param(params, "comment")?);
    locate_comment(&state.repos.comments, id).await
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentFilter {
    pub post: Option<i64>,
    pub blog: Option<i64>,
    pub fandom: Option<i64>,
}

/// GET /comments
///
/// Narrowing order when several filters are given: post, then blog,
/// then fandom, then everything.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<CommentFilter>,
) -> ApiResult<Data<Vec<CommentRow>>> {
    let comments = if let Some(post) = filter.post {
        state.repos.comments.list_by_post(PostId(post)).await?
    } else if let Some(blog) = filter.blog {
        state.repos.comments.list_by_blog(BlogId(blog)).await?
    } else if let Some(fandom) = filter.fandom {
        state.repos.comments.list_by_fandom(FandomId(fandom)).await?
    } else {
        state.repos.comments.list().await?
    };

    Ok(Data(comments))
}

/// GET /comments/{comment}
pub async fn get(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<CommentRow>> {
    Ok(Data(comment_from_path(&state, &params).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// PATCH /comments/{comment}
pub async fn update(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<UpdateCommentRequest>,
) -> ApiResult<Data<()>> {
    require_len("content", &req.content, 1, 8192)?;

    let comment = comment_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_edit_comment(
                principal,
                UserId(comment.owner),
                BlogId(comment.blog_id),
                FandomId(comment.fandom_id),
            )
            .await?,
    )?;

    state
        .repos
        .comments
        .update(
            CommentId(comment.id),
            UpdateComment {
                content: req.content,
                edited_by: principal,
            },
        )
        .await?;

    Ok(Data(()))
}

/// GET /comments/{comment}/history
pub async fn history(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<CommentRow>>> {
    let comment = comment_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_edit_comment(
                principal,
                UserId(comment.owner),
                BlogId(comment.blog_id),
                FandomId(comment.fandom_id),
            )
            .await?,
    )?;

    Ok(Data(
        state.repos.comments.history(CommentId(comment.id)).await?,
    ))
}

/// GET /comments/{comment}/answers
pub async fn answers_list(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<CommentRow>>> {
    let comment = comment_from_path(&state, &params).await?;

    Ok(Data(
        state.repos.comments.answers(CommentId(comment.id)).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub content: String,
}

/// POST /comments/{comment}/answers
pub async fn answers_create(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<AnswerRequest>,
) -> ApiResult<Created> {
    require_len("content", &req.content, 1, 8192)?;

    let parent = comment_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_publish(
                principal,
                BlogId(parent.blog_id),
                FandomId(parent.fandom_id),
            )
            .await?,
    )?;

    let id = state
        .repos
        .comments
        .create(CreateComment {
            post_id: PostId(parent.post_id),
            blog_id: BlogId(parent.blog_id),
            fandom_id: FandomId(parent.fandom_id),
            owner: principal,
            parent_id: Some(CommentId(parent.id)),
            content: req.content,
        })
        .await?;

    Ok(Created::at(format!("/comments/{id}")))
}

/// GET /comments/{comment}/votes
pub async fn votes_list(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<VoteRow>>> {
    let comment = comment_from_path(&state, &params).await?;

    if state.resolver.can_view_votes(principal).await? {
        return Ok(Data(
            state.repos.comments.votes(CommentId(comment.id)).await?,
        ));
    }

    if principal.is_anonymous() {
        return Ok(Data(Vec::new()));
    }
    let own = state
        .repos
        .comments
        .find_vote(CommentId(comment.id), principal)
        .await?;
    Ok(Data(own.into_iter().collect()))
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote: bool,
}

/// PUT /comments/{comment}/votes
pub async fn votes_put(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<VoteRequest>,
) -> ApiResult<Data<()>> {
    let comment = comment_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_publish(
                principal,
                BlogId(comment.blog_id),
                FandomId(comment.fandom_id),
            )
            .await?,
    )?;

    state
        .repos
        .comments
        .upsert_vote(CommentId(comment.id), principal, req.vote)
        .await?;

    Ok(Data(()))
}
