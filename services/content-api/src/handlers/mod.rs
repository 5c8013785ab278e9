//! Request handlers, one module per resource

pub mod auth;
pub mod blogs;
pub mod comments;
pub mod fandoms;
pub mod posts;
pub mod users;

use std::collections::HashMap;

use fanhall_auth_core::AuthError;

use crate::error::{ApiError, ApiResult};

/// Reject a field outside its length bounds
pub(crate) fn require_len(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> ApiResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::Validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

/// Parse a numeric-only path param (moder/banned sub-resources and the
/// top-level post/comment/blog ids)
pub(crate) fn numeric_param(params: &HashMap<String, String>, key: &str) -> ApiResult<i64> {
    let raw = params
        .get(key)
        .ok_or_else(|| ApiError::Internal(format!("missing path param {key}")))?;
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AuthError::ObjectNotFound.into());
    }
    raw.parse().map_err(|_| AuthError::ObjectNotFound.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_len() {
        assert!(require_len("username", "alice", 1, 64).is_ok());
        assert!(require_len("username", "", 1, 64).is_err());
        assert!(require_len("username", &"D".repeat(65), 1, 64).is_err());
        assert!(require_len("username", &"D".repeat(64), 1, 64).is_ok());
    }

    #[test]
    fn test_numeric_param() {
        let mut params = HashMap::new();
        params.insert("post".to_string(), "17".to_string());
        assert_eq!(numeric_param(&params, "post").unwrap(), 17);

        params.insert("post".to_string(), "17x".to_string());
        assert!(numeric_param(&params, "post").is_err());
    }
}
