//! Auth and authorization errors

use fanhall_db::DbError;
use fanhall_types::ScopeKind;
use thiserror::Error;

/// Errors raised by the auth core.
///
/// None of these format HTTP responses; the service boundary maps each
/// kind to a status code and envelope.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Authorization header present but not `Token <value>`
    #[error("malformed authorization header")]
    InvalidHeaderValue,

    /// Malformed segments, bad signature or bad origin binding
    #[error("invalid token")]
    InvalidToken,

    /// Signature valid but the embedded expiry is in the past
    #[error("token expired")]
    ExpiredToken,

    /// Unknown username or wrong password; never distinguished
    #[error("invalid username or password")]
    AuthFail,

    /// Username already registered
    #[error("username already taken")]
    UsernameAlreadyTaken,

    /// Authorization denied
    #[error("forbidden")]
    Forbidden,

    /// Target entity does not exist
    #[error("the specified object does not exist")]
    ObjectNotFound,

    /// Target already holds a moderation grant at this scope
    #[error("user is a {0} moderator")]
    UserIsModer(ScopeKind),

    /// Target is already banned at this scope
    #[error("user is banned in this {0}")]
    UserIsBanned(ScopeKind),

    /// Target owns the resource
    #[error("user owns this resource")]
    UserIsOwner,

    /// Database error
    #[error("database error: {0}")]
    Database(DbError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidHeaderValue
            | Self::InvalidToken
            | Self::ExpiredToken
            | Self::AuthFail => 400,
            Self::Forbidden => 403,
            Self::ObjectNotFound => 404,
            Self::UsernameAlreadyTaken
            | Self::UserIsModer(_)
            | Self::UserIsBanned(_)
            | Self::UserIsOwner => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Error code for the response envelope
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidHeaderValue => "InvalidHeaderValue",
            Self::InvalidToken => "InvalidToken",
            Self::ExpiredToken => "ExpiredToken",
            Self::AuthFail => "AuthFail",
            Self::UsernameAlreadyTaken => "UsernameAlreadyTaken",
            Self::Forbidden => "Forbidden",
            Self::ObjectNotFound => "ObjectNotFound",
            Self::UserIsModer(_) => "UserIsModer",
            Self::UserIsBanned(_) => "UserIsBanned",
            Self::UserIsOwner => "UserIsOwner",
            Self::Database(_) | Self::Internal(_) => "InternalServerError",
        }
    }
}

impl From<DbError> for AuthError {
    fn from(err: DbError) -> Self {
        tracing::error!("database error: {}", err);
        Self::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::InvalidToken.status_code(), 400);
        assert_eq!(AuthError::ExpiredToken.status_code(), 400);
        assert_eq!(AuthError::AuthFail.status_code(), 400);
        assert_eq!(AuthError::Forbidden.status_code(), 403);
        assert_eq!(AuthError::ObjectNotFound.status_code(), 404);
        assert_eq!(AuthError::UsernameAlreadyTaken.status_code(), 409);
        assert_eq!(AuthError::UserIsBanned(ScopeKind::Fandom).status_code(), 409);
        assert_eq!(AuthError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_error_codes_match_kind_names() {
        assert_eq!(AuthError::InvalidToken.error_code(), "InvalidToken");
        assert_eq!(
            AuthError::UserIsModer(ScopeKind::Blog).error_code(),
            "UserIsModer"
        );
        assert_eq!(AuthError::Internal("x".into()).error_code(), "InternalServerError");
    }
}
