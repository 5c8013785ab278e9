//! Fandom endpoints: the communities themselves, their moderator
//! roster, bans, blogs and content listings

use axum::extract::{Path, State};
use serde::Deserialize;
use std::collections::HashMap;

use fanhall_auth_core::{authorize, AuthError};
use fanhall_db::{
    BlogRepository, BlogRow, CommentRepository, CommentRow, CreateBlog, CreateFandom, DbError,
    FandomBan, FandomBanRow, FandomGrant, FandomModerRow, FandomRepository, FandomRow,
    ModerationRepository, PostRepository, PostRow, UpdateFandom,
};
use fanhall_types::{FandomId, UserId};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{Body, Principal};
use crate::handlers::{numeric_param, require_len};
use crate::locator::{locate_blog_in_fandom, locate_fandom, Selector};
use crate::response::{Created, Data};
use crate::state::AppState;

async fn fandom_from_path(
    state: &AppState,
    params: &HashMap<String, String>,
) -> ApiResult<FandomRow> {
    let selector = Selector::from_params(params, "fandom")?;
    locate_fandom(&state.repos.fandoms, &selector).await
}

fn validate_url(url: &str) -> ApiResult<()> {
    require_len("url", url, 1, 64)?;
    if !url
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return Err(ApiError::Validation(
            "url may contain only letters, digits, '_' and '-'".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Fandoms
// ============================================================================

/// GET /fandoms
pub async fn list(State(state): State<AppState>) -> ApiResult<Data<Vec<FandomRow>>> {
    Ok(Data(state.repos.fandoms.list().await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateFandomRequest {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
}

/// POST /fandoms
pub async fn create(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Body(req): Body<CreateFandomRequest>,
) -> ApiResult<Created> {
    validate_url(&req.url)?;
    require_len("title", &req.title, 1, 128)?;

    authorize(state.resolver.can_create_fandom(principal).await?)?;

    let id = state
        .repos
        .fandoms
        .create(CreateFandom {
            url: req.url,
            title: req.title,
            description: req.description,
            avatar: req.avatar,
            created_by: principal,
        })
        .await
        .map_err(|err| match err {
            DbError::UniqueViolation { .. } => ApiError::FandomUrlAlreadyTaken,
            other => other.into(),
        })?;

    Ok(Created::at(format!("/fandoms/{id}")))
}

/// GET /fandoms/{fandom}
pub async fn get(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<FandomRow>> {
    Ok(Data(fandom_from_path(&state, &params).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateFandomRequest {
    pub title: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
}

/// PATCH /fandoms/{fandom}
pub async fn update(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<UpdateFandomRequest>,
) -> ApiResult<Data<()>> {
    require_len("title", &req.title, 1, 128)?;

    let fandom = fandom_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_edit_fandom(principal, FandomId(fandom.id))
            .await?,
    )?;

    state
        .repos
        .fandoms
        .update(
            FandomId(fandom.id),
            UpdateFandom {
                title: req.title,
                description: req.description,
                avatar: req.avatar,
                edited_by: principal,
            },
        )
        .await?;

    Ok(Data(()))
}

/// GET /fandoms/{fandom}/history
pub async fn history(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<FandomRow>>> {
    let fandom = fandom_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_edit_fandom(principal, FandomId(fandom.id))
            .await?,
    )?;

    Ok(Data(
        state.repos.fandoms.history(FandomId(fandom.id)).await?,
    ))
}

// ============================================================================
// Moderators
// ============================================================================

/// GET /fandoms/{fandom}/moders
pub async fn moders_list(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<FandomModerRow>>> {
    let fandom = fandom_from_path(&state, &params).await?;

    Ok(Data(
        state
            .repos
            .moderation
            .list_fandom_moders(FandomId(fandom.id))
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct FandomModerRequest {
    pub user_id: i64,
    pub edit_f: bool,
    pub manage_f: bool,
    pub ban_f: bool,
    pub create_b: bool,
    pub edit_b: bool,
    pub edit_p: bool,
    pub edit_c: bool,
}

impl FandomModerRequest {
    fn into_grant(self, fandom: FandomId, set_by: UserId) -> FandomGrant {
        FandomGrant {
            user_id: UserId(self.user_id),
            fandom_id: fandom,
            set_by,
            edit_f: self.edit_f,
            manage_f: self.manage_f,
            ban_f: self.ban_f,
            create_b: self.create_b,
            edit_b: self.edit_b,
            edit_p: self.edit_p,
            edit_c: self.edit_c,
        }
    }
}

/// POST /fandoms/{fandom}/moders
pub async fn moders_create(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<FandomModerRequest>,
) -> ApiResult<Created> {
    let fandom = fandom_from_path(&state, &params).await?;
    let user_id = req.user_id;

    state
        .guard
        .grant_fandom_moder(principal, req.into_grant(FandomId(fandom.id), principal))
        .await?;

    Ok(Created::at(format!(
        "/fandoms/{}/moders/{user_id}",
        fandom.id
    )))
}

/// GET /fandoms/{fandom}/moders/{moder}
pub async fn moders_get(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<FandomModerRow>> {
    let fandom = fandom_from_path(&state, &params).await?;
    let moder = UserId(numeric_param(&params, "moder")?);

    state
        .repos
        .moderation
        .find_fandom_moder(FandomId(fandom.id), moder)
        .await?
        .map(Data)
        .ok_or_else(|| AuthError::ObjectNotFound.into())
}

/// PATCH /fandoms/{fandom}/moders/{moder}
pub async fn moders_update(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<FandomModerRequest>,
) -> ApiResult<Data<()>> {
    let fandom = fandom_from_path(&state, &params).await?;
    let moder = UserId(numeric_param(&params, "moder")?);

    let mut grant = req.into_grant(FandomId(fandom.id), principal);
    grant.user_id = moder;
    state.guard.update_fandom_moder(principal, grant).await?;

    Ok(Data(()))
}

/// DELETE /fandoms/{fandom}/moders/{moder}
pub async fn moders_delete(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<()>> {
    let fandom = fandom_from_path(&state, &params).await?;
    let moder = UserId(numeric_param(&params, "moder")?);

    state
        .guard
        .revoke_fandom_moder(principal, FandomId(fandom.id), moder)
        .await?;

    Ok(Data(()))
}

// ============================================================================
// Bans
// ============================================================================

/// GET /fandoms/{fandom}/bans
pub async fn bans_list(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<FandomBanRow>>> {
    let fandom = fandom_from_path(&state, &params).await?;

    Ok(Data(
        state
            .repos
            .moderation
            .list_fandom_bans(FandomId(fandom.id))
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct BanRequest {
    pub user_id: i64,
    pub reason: String,
}

/// POST /fandoms/{fandom}/bans
pub async fn bans_create(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<BanRequest>,
) -> ApiResult<Created> {
    require_len("reason", &req.reason, 1, 512)?;

    let fandom = fandom_from_path(&state, &params).await?;

    state
        .guard
        .ban_fandom_user(
            principal,
            FandomBan {
                user_id: UserId(req.user_id),
                fandom_id: FandomId(fandom.id),
                set_by: principal,
                reason: req.reason,
            },
        )
        .await?;

    Ok(Created::at(format!(
        "/fandoms/{}/bans/{}",
        fandom.id, req.user_id
    )))
}

/// GET /fandoms/{fandom}/bans/{banned}
pub async fn bans_get(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<FandomBanRow>> {
    let fandom = fandom_from_path(&state, &params).await?;
    let banned = UserId(numeric_param(&params, "banned")?);

    state
        .repos
        .moderation
        .find_fandom_ban(FandomId(fandom.id), banned)
        .await?
        .map(Data)
        .ok_or_else(|| AuthError::ObjectNotFound.into())
}

/// DELETE /fandoms/{fandom}/bans/{banned}
pub async fn bans_delete(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<()>> {
    let fandom = fandom_from_path(&state, &params).await?;
    let banned = UserId(numeric_param(&params, "banned")?);

    state
        .guard
        .lift_fandom_ban(principal, FandomId(fandom.id), banned)
        .await?;

    Ok(Data(()))
}

// ============================================================================
// Blogs and content
// ============================================================================

/// GET /fandoms/{fandom}/blogs
pub async fn blogs_list(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<BlogRow>>> {
    let fandom = fandom_from_path(&state, &params).await?;

    Ok(Data(
        state
            .repos
            .blogs
            .list_by_fandom(FandomId(fandom.id))
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
}

/// POST /fandoms/{fandom}/blogs
pub async fn blogs_create(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(params): Path<HashMap<String, String>>,
    Body(req): Body<CreateBlogRequest>,
) -> ApiResult<Created> {
    validate_url(&req.url)?;
    require_len("title", &req.title, 1, 128)?;

    let fandom = fandom_from_path(&state, &params).await?;
    authorize(
        state
            .resolver
            .can_create_blog(principal, FandomId(fandom.id))
            .await?,
    )?;

    let id = state
        .repos
        .blogs
        .create(CreateBlog {
            fandom_id: FandomId(fandom.id),
            owner: principal,
            url: req.url,
            title: req.title,
            description: req.description,
            avatar: req.avatar,
        })
        .await
        .map_err(|err| match err {
            DbError::UniqueViolation { .. } => ApiError::BlogUrlAlreadyTaken,
            other => other.into(),
        })?;

    Ok(Created::at(format!("/blogs/{id}")))
}

/// GET /fandoms/{fandom}/blogs/{blog}
pub async fn blogs_get(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<BlogRow>> {
    let fandom = fandom_from_path(&state, &params).await?;
    let selector = Selector::from_params(&params, "blog")?;
    let blog = locate_blog_in_fandom(&state.repos.blogs, FandomId(fandom.id), &selector).await?;

    Ok(Data(blog))
}

/// GET /fandoms/{fandom}/posts
pub async fn posts_list(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<PostRow>>> {
    let fandom = fandom_from_path(&state, &params).await?;

    Ok(Data(
        state
            .repos
            .posts
            .list_by_fandom(FandomId(fandom.id))
            .await?,
    ))
}

/// GET /fandoms/{fandom}/comments
pub async fn comments_list(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Data<Vec<CommentRow>>> {
    let fandom = fandom_from_path(&state, &params).await?;

    Ok(Data(
        state
            .repos
            .comments
            .list_by_fandom(FandomId(fandom.id))
            .await?,
    ))
}
