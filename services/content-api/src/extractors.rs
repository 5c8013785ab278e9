//! Axum extractors: the authentication gate, the client origin, and the
//! JSON body wrapper.

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, FromRef, FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::header;
use axum::Json;
use serde::de::DeserializeOwned;
use std::net::SocketAddr;

use fanhall_auth_core::AuthError;
use fanhall_types::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated principal of a request.
///
/// Absent `Authorization` header means the anonymous principal, not an
/// error: most reads are anonymous-allowed. A present header must carry
/// the `Token <value>` scheme; the token is verified for signature,
/// expiry and origin binding before the account id is attached.
#[derive(Debug, Clone, Copy)]
pub struct Principal(pub UserId);

impl<S> FromRequestParts<S> for Principal
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let app_state = AppState::from_ref(state);

            let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
                return Ok(Principal(UserId::ANONYMOUS));
            };

            let auth_str = auth_header
                .to_str()
                .map_err(|_| AuthError::InvalidHeaderValue)?;
            let token = auth_str
                .strip_prefix("Token ")
                .ok_or(AuthError::InvalidHeaderValue)?;

            let origin = client_origin(parts)?;
            let user = app_state.tokens.verify_access(token, &origin).map_err(|err| {
                tracing::debug!(error = %err, "access token rejected");
                err
            })?;

            Ok(Principal(user))
        })
    }
}

/// The client's reported network origin: the `X-Real-IP` header set by
/// the fronting proxy, or the socket peer address without one.
#[derive(Debug, Clone)]
pub struct ClientOrigin(pub String);

impl<S> FromRequestParts<S> for ClientOrigin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move { client_origin(parts).map(ClientOrigin) })
    }
}

fn client_origin(parts: &Parts) -> Result<String, ApiError> {
    if let Some(value) = parts.headers.get("x-real-ip") {
        return value
            .to_str()
            .map(str::to_string)
            .map_err(|_| AuthError::InvalidHeaderValue.into());
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .ok_or_else(|| ApiError::Internal("client origin unavailable".to_string()))
}

/// JSON body extractor whose rejections speak the error envelope:
/// a syntactically broken body is `InvalidJson`, a body of the wrong
/// shape is `ValidationError`.
pub struct Body<T>(pub T);

impl<S, T> FromRequest<S> for Body<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request<'life0, 'async_trait>(
        req: Request,
        state: &'life0 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            match Json::<T>::from_request(req, state).await {
                Ok(Json(value)) => Ok(Body(value)),
                Err(JsonRejection::JsonDataError(err)) => {
                    Err(ApiError::Validation(err.body_text()))
                }
                Err(_) => Err(ApiError::InvalidJson),
            }
        })
    }
}
