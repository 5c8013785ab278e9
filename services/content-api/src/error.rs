//! Error types and the response envelope boundary.
//!
//! Every core error kind maps to a status code and a
//! `{"status": "fail"|"error", "data": {"code", "description"}}` body
//! here, and nowhere else. Internal errors are logged and downgraded to
//! a generic description; their text never reaches the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use fanhall_auth_core::AuthError;
use fanhall_db::DbError;

/// Error envelope body
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub status: &'static str,
    pub data: ErrorData,
}

#[derive(Debug, Serialize)]
pub struct ErrorData {
    pub code: &'static str,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Core auth/authz error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Fandom url already registered
    #[error("fandom url already taken")]
    FandomUrlAlreadyTaken,

    /// Blog url already taken inside its fandom
    #[error("blog url already taken")]
    BlogUrlAlreadyTaken,

    /// Request body failed field validation
    #[error("{0}")]
    Validation(String),

    /// Request body is not valid JSON
    #[error("request body is not valid JSON")]
    InvalidJson,

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(err) => {
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::FandomUrlAlreadyTaken | Self::BlogUrlAlreadyTaken => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidJson => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Auth(err) => err.error_code(),
            Self::FandomUrlAlreadyTaken => "FandomUrlAlreadyTaken",
            Self::BlogUrlAlreadyTaken => "BlogUrlAlreadyTaken",
            Self::Validation(_) => "ValidationError",
            Self::InvalidJson => "InvalidJson",
            Self::Internal(_) => "InternalServerError",
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        Self::Auth(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let description = if status.is_server_error() {
            tracing::error!(error = ?self, "internal API error");
            "Server got itself in trouble.".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorEnvelope {
            status: if status.is_server_error() { "error" } else { "fail" },
            data: ErrorData {
                code: self.error_code(),
                description,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
