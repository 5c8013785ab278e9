//! Credential endpoints: register, login, refresh, invalidate, change

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::extractors::{Body, ClientOrigin};
use crate::handlers::require_len;
use crate::response::{Created, Data};
use crate::state::AppState;

const USERNAME_MAX: usize = 64;
const PASSWORD_MAX: usize = 256;

fn validate_username(username: &str) -> ApiResult<()> {
    require_len("username", username, 1, USERNAME_MAX)
}

fn validate_password(field: &'static str, password: &str) -> ApiResult<()> {
    require_len(field, password, 1, PASSWORD_MAX)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Body(req): Body<RegisterRequest>,
) -> ApiResult<Created> {
    validate_username(&req.username)?;
    validate_password("password", &req.password)?;

    let id = state.tokens.register(&req.username, &req.password).await?;

    Ok(Created::at(format!("/users/{id}")))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ClientOrigin(origin): ClientOrigin,
    Body(req): Body<LoginRequest>,
) -> ApiResult<Data<LoginResponse>> {
    validate_username(&req.username)?;
    validate_password("password", &req.password)?;

    let pair = state
        .tokens
        .login(&req.username, &req.password, &origin)
        .await?;

    Ok(Data(LoginResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ClientOrigin(origin): ClientOrigin,
    Body(req): Body<RefreshRequest>,
) -> ApiResult<Data<RefreshResponse>> {
    let access_token = state.tokens.refresh(&req.refresh_token, &origin).await?;

    Ok(Data(RefreshResponse { access_token }))
}

#[derive(Debug, Deserialize)]
pub struct InvalidateRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/invalidate
///
/// Rotates the account's revocation nonce: every outstanding refresh
/// token stops validating. Outstanding access tokens run out on their
/// own short expiry.
pub async fn invalidate(
    State(state): State<AppState>,
    Body(req): Body<InvalidateRequest>,
) -> ApiResult<Data<()>> {
    validate_username(&req.username)?;
    validate_password("password", &req.password)?;

    state.tokens.invalidate(&req.username, &req.password).await?;

    Ok(Data(()))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub username: String,
    pub password: String,
    pub new_password: String,
}

/// POST /auth/change
pub async fn change(
    State(state): State<AppState>,
    Body(req): Body<ChangePasswordRequest>,
) -> ApiResult<Data<()>> {
    validate_username(&req.username)?;
    validate_password("password", &req.password)?;
    validate_password("new_password", &req.new_password)?;

    state
        .tokens
        .change_password(&req.username, &req.password, &req.new_password)
        .await?;

    Ok(Data(()))
}
