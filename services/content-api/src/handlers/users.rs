//! User endpoints: listing, profiles, history and owned content

use axum::extract::{Path, State};
use serde::Deserialize;
use std::collections::HashMap;

use fanhall_auth_core::authorize;
use fanhall_db::{
    BlogRepository, BlogRow, CommentRepository, CommentRow, PostRepository, PostRow,
    UpdateProfile, UserRepository, UserRow,
};
use fanhall_types::UserId;

use crate::error::ApiResult;
use crate::extractors::{Body, Principal};
use crate::handlers::require_len;
use crate::locator::{locate_user, Selector};
use crate::response::Data;
use crate::state::AppState;

/// GET /users
pub async fn list(State(state): State<AppState>) -> ApiResult<Data<Vec<UserRow>>> {
    Ok(Data(state.repos.users.list().await?))
}

/// GET /users/{user}
pub async fn get(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<UserRow>> {
    let selector = Selector::from_params(&params, "user")?;
    let user = locate_user(&state.repos.users, principal, &selector).await?;

    Ok(Data(user))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub description: Option<String>,
    pub avatar: Option<String>,
}

/// PATCH /users/{user}
pub async fn update(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<UpdateProfileRequest>,
) -> ApiResult<Data<()>> {
    if let Some(ref description) = req.description {
        require_len("description", description, 0, 1024)?;
    }

    let selector = Selector::from_params(&params, "user")?;
    let user = locate_user(&state.repos.users, principal, &selector).await?;

    authorize(
        state
            .resolver
            .can_edit_profile(principal, UserId(user.id))
            .await?,
    )?;

    state
        .repos
        .users
        .update_profile(
            UserId(user.id),
            UpdateProfile {
                description: req.description,
                avatar: req.avatar,
                edited_by: principal,
            },
        )
        .await?;

    Ok(Data(()))
}

/// GET /users/{user}/history
pub async fn history(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<UserRow>>> {
    let selector = Selector::from_params(&params, "user")?;
    let user = locate_user(&state.repos.users, principal, &selector).await?;

    authorize(
        state
            .resolver
            .can_edit_profile(principal, UserId(user.id))
            .await?,
    )?;

    Ok(Data(state.repos.users.history(UserId(user.id)).await?))
}

/// GET /users/{user}/blogs
pub async fn blogs(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<BlogRow>>> {
    let selector = Selector::from_params(&params, "user")?;
    let user = locate_user(&state.repos.users, principal, &selector).await?;

    Ok(Data(
        state.repos.blogs.list_by_owner(UserId(user.id)).await?,
    ))
}

/// GET /users/{user}/posts
pub async fn posts(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<PostRow>>> {
    let selector = Selector::from_params(&params, "user")?;
    let user = locate_user(&state.repos.users, principal, &selector).await?;

    Ok(Data(
        state.repos.posts.list_by_owner(UserId(user.id)).await?,
    ))
}

/// GET /users/{user}/comments
pub async fn comments(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<CommentRow>>> {
    let selector = Selector::from_params(&params, "user")?;
    let user = locate_user(&state.repos.users, principal, &selector).await?;

    Ok(Data(
        state.repos.comments.list_by_owner(UserId(user.id)).await?,
    ))
}
