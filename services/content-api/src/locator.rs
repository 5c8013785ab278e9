//! Resource locator: path-token parsing and entity resolution.
//!
//! A path token selects an entity one of three ways: all-decimal digits
//! are a numeric id, the `u/` prefix marks a case-insensitive slug, and
//! the literal `current` names the authenticated principal's own
//! account. Anything else does not name an entity.

use std::collections::HashMap;

use fanhall_db::{BlogRepository, BlogRow, FandomRepository, FandomRow, UserRepository, UserRow};
use fanhall_types::{BlogId, CommentId, FandomId, PostId, UserId};

use crate::error::{ApiError, ApiResult};
use fanhall_auth_core::AuthError;

/// A parsed path selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Numeric id
    Id(i64),
    /// Human-readable unique slug, matched case-insensitively
    Slug(String),
    /// The authenticated principal's own account
    Current,
}

impl Selector {
    /// Parse a path token. Tokens that fit none of the three forms name
    /// nothing and resolve to `ObjectNotFound`.
    pub fn parse(token: &str) -> Result<Self, ApiError> {
        if token == "current" {
            return Ok(Self::Current);
        }
        if let Some(slug) = token.strip_prefix("u/") {
            if slug.is_empty() {
                return Err(AuthError::ObjectNotFound.into());
            }
            return Ok(Self::Slug(slug.to_string()));
        }
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            return token
                .parse()
                .map(Self::Id)
                .map_err(|_| AuthError::ObjectNotFound.into());
        }
        Err(AuthError::ObjectNotFound.into())
    }

    /// Build a selector from captured path params: the slug route
    /// variant captures `<key>_slug`, the plain variant captures `<key>`.
    pub fn from_params(params: &HashMap<String, String>, key: &str) -> Result<Self, ApiError> {
        if let Some(slug) = params.get(&format!("{key}_slug")) {
            return Self::parse(&format!("u/{slug}"));
        }
        match params.get(key) {
            Some(token) => Self::parse(token),
            None => Err(ApiError::Internal(format!("missing path param {key}"))),
        }
    }
}

/// Resolve a user selector. `current` requires an authenticated
/// principal.
pub async fn locate_user<R: UserRepository>(
    repo: &R,
    principal: UserId,
    selector: &Selector,
) -> ApiResult<UserRow> {
    let row = match selector {
        Selector::Id(id) => repo.find_by_id(UserId(*id)).await?,
        Selector::Slug(slug) => repo.find_by_username(slug).await?,
        Selector::Current => {
            if principal.is_anonymous() {
                return Err(AuthError::Forbidden.into());
            }
            repo.find_by_id(principal).await?
        }
    };

    row.ok_or_else(|| AuthError::ObjectNotFound.into())
}

/// Resolve a fandom selector. Fandoms have no `current`.
pub async fn locate_fandom<R: FandomRepository>(
    repo: &R,
    selector: &Selector,
) -> ApiResult<FandomRow> {
    let row = match selector {
        Selector::Id(id) => repo.find_by_id(FandomId(*id)).await?,
        Selector::Slug(slug) => repo.find_by_url(slug).await?,
        Selector::Current => None,
    };

    row.ok_or_else(|| AuthError::ObjectNotFound.into())
}

/// Resolve a blog selector inside a fandom. Slugs are unique per
/// fandom; ids found in a different fandom do not name this route's
/// entity.
pub async fn locate_blog_in_fandom<R: BlogRepository>(
    repo: &R,
    fandom: FandomId,
    selector: &Selector,
) -> ApiResult<BlogRow> {
    let row = match selector {
        Selector::Id(id) => repo
            .find_by_id(BlogId(*id))
            .await?
            .filter(|blog| blog.fandom_id == fandom.0),
        Selector::Slug(slug) => repo.find_by_url(fandom, slug).await?,
        Selector::Current => None,
    };

    row.ok_or_else(|| AuthError::ObjectNotFound.into())
}

/// Resolve a top-level blog id
pub async fn locate_blog<R: BlogRepository>(repo: &R, id: BlogId) -> ApiResult<BlogRow> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AuthError::ObjectNotFound.into())
}

/// Resolve a post id
pub async fn locate_post<R: fanhall_db::PostRepository>(
    repo: &R,
    id: PostId,
) -> ApiResult<fanhall_db::PostRow> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AuthError::ObjectNotFound.into())
}

/// Resolve a comment id
pub async fn locate_comment<R: fanhall_db::CommentRepository>(
    repo: &R,
    id: CommentId,
) -> ApiResult<fanhall_db::CommentRow> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AuthError::ObjectNotFound.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(Selector::parse("42").unwrap(), Selector::Id(42));
        assert_eq!(Selector::parse("0").unwrap(), Selector::Id(0));
    }

    #[test]
    fn test_parse_slug() {
        assert_eq!(
            Selector::parse("u/alice").unwrap(),
            Selector::Slug("alice".to_string())
        );
    }

    #[test]
    fn test_parse_current() {
        assert_eq!(Selector::parse("current").unwrap(), Selector::Current);
    }

    #[test]
    fn test_parse_rejections() {
        for token in ["", "u/", "alice", "-1", "4 2", "42x", "current "] {
            assert!(Selector::parse(token).is_err(), "{token:?}");
        }
    }

    #[test]
    fn test_from_params_prefers_slug_capture() {
        let mut params = HashMap::new();
        params.insert("user".to_string(), "7".to_string());
        assert_eq!(
            Selector::from_params(&params, "user").unwrap(),
            Selector::Id(7)
        );

        let mut params = HashMap::new();
        params.insert("user_slug".to_string(), "alice".to_string());
        assert_eq!(
            Selector::from_params(&params, "user").unwrap(),
            Selector::Slug("alice".to_string())
        );
    }
}
