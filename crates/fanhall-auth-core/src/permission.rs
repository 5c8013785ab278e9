//! Cascading permission resolver
//!
//! A pure query layer over the grant/ban/ownership data, evaluated fresh
//! on every call. Each predicate is the OR of the layers that apply to
//! its action: site admin, scope grant with the named flag, ownership,
//! and (for blog-scoped content actions) a community-level grant with
//! the matching flag. The anonymous principal fails every predicate.

use std::sync::Arc;

use fanhall_db::AccessCheckRepository;
use fanhall_types::{BlogFlag, BlogId, FandomFlag, FandomId, UserId};

use crate::error::AuthError;

/// Turn a predicate result into `Forbidden` on denial
pub fn authorize(allowed: bool) -> Result<(), AuthError> {
    if allowed {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Permission resolver over an access-check repository
#[derive(Clone)]
pub struct PermissionResolver<A: AccessCheckRepository> {
    checks: Arc<A>,
}

impl<A: AccessCheckRepository> PermissionResolver<A> {
    /// Create a new permission resolver
    pub fn new(checks: Arc<A>) -> Self {
        Self { checks }
    }

    /// Site admin: passes every check at every scope
    pub async fn is_admin(&self, principal: UserId) -> Result<bool, AuthError> {
        if principal.is_anonymous() {
            return Ok(false);
        }
        Ok(self.checks.is_admin(principal).await?)
    }

    /// Fandom grant with an optional required flag
    pub async fn fandom_moder(
        &self,
        principal: UserId,
        fandom: FandomId,
        flag: Option<FandomFlag>,
    ) -> Result<bool, AuthError> {
        if principal.is_anonymous() {
            return Ok(false);
        }
        Ok(self.checks.fandom_moder(principal, fandom, flag).await?)
    }

    /// Blog grant with an optional required flag
    pub async fn blog_moder(
        &self,
        principal: UserId,
        blog: BlogId,
        flag: Option<BlogFlag>,
    ) -> Result<bool, AuthError> {
        if principal.is_anonymous() {
            return Ok(false);
        }
        Ok(self.checks.blog_moder(principal, blog, flag).await?)
    }

    /// Blog ownership
    pub async fn blog_owner(&self, principal: UserId, blog: BlogId) -> Result<bool, AuthError> {
        if principal.is_anonymous() {
            return Ok(false);
        }
        Ok(self.checks.blog_owner(principal, blog).await?)
    }

    /// Edit the fandom itself or read its edit history
    pub async fn can_edit_fandom(
        &self,
        principal: UserId,
        fandom: FandomId,
    ) -> Result<bool, AuthError> {
        if self
            .fandom_moder(principal, fandom, Some(FandomFlag::EditF))
            .await?
        {
            return Ok(true);
        }
        self.is_admin(principal).await
    }

    /// Create a fandom: admin only
    pub async fn can_create_fandom(&self, principal: UserId) -> Result<bool, AuthError> {
        self.is_admin(principal).await
    }

    /// Manage the fandom's moderator roster
    pub async fn can_manage_fandom_moders(
        &self,
        principal: UserId,
        fandom: FandomId,
    ) -> Result<bool, AuthError> {
        if self
            .fandom_moder(principal, fandom, Some(FandomFlag::ManageF))
            .await?
        {
            return Ok(true);
        }
        self.is_admin(principal).await
    }

    /// Ban and unban users at fandom scope
    pub async fn can_ban_in_fandom(
        &self,
        principal: UserId,
        fandom: FandomId,
    ) -> Result<bool, AuthError> {
        if self
            .fandom_moder(principal, fandom, Some(FandomFlag::BanF))
            .await?
        {
            return Ok(true);
        }
        self.is_admin(principal).await
    }

    /// Create a blog inside a fandom: any authenticated account not
    /// banned there
    pub async fn can_create_blog(
        &self,
        principal: UserId,
        fandom: FandomId,
    ) -> Result<bool, AuthError> {
        if principal.is_anonymous() {
            return Ok(false);
        }
        Ok(!self.checks.fandom_banned(principal, fandom).await?)
    }

    /// Edit a blog or read its history. Community moderators with the
    /// matching flag may act on any blog in their fandom.
    pub async fn can_edit_blog(
        &self,
        principal: UserId,
        blog: BlogId,
        fandom: FandomId,
        owner: UserId,
    ) -> Result<bool, AuthError> {
        if !principal.is_anonymous() && principal == owner {
            return Ok(true);
        }
        if self
            .blog_moder(principal, blog, Some(BlogFlag::EditB))
            .await?
        {
            return Ok(true);
        }
        if self
            .fandom_moder(principal, fandom, Some(FandomFlag::EditB))
            .await?
        {
            return Ok(true);
        }
        self.is_admin(principal).await
    }

    /// Manage the blog's moderator roster
    pub async fn can_manage_blog_moders(
        &self,
        principal: UserId,
        blog: BlogId,
    ) -> Result<bool, AuthError> {
        if self.blog_owner(principal, blog).await? {
            return Ok(true);
        }
        if self
            .blog_moder(principal, blog, Some(BlogFlag::ManageB))
            .await?
        {
            return Ok(true);
        }
        self.is_admin(principal).await
    }

    /// Ban and unban users at blog scope
    pub async fn can_ban_in_blog(
        &self,
        principal: UserId,
        blog: BlogId,
    ) -> Result<bool, AuthError> {
        if self.blog_owner(principal, blog).await? {
            return Ok(true);
        }
        if self
            .blog_moder(principal, blog, Some(BlogFlag::BanB))
            .await?
        {
            return Ok(true);
        }
        self.is_admin(principal).await
    }

    /// Publish content (posts, comments, votes) under a blog: any
    /// authenticated account not banned at either containing scope
    pub async fn can_publish(
        &self,
        principal: UserId,
        blog: BlogId,
        fandom: FandomId,
    ) -> Result<bool, AuthError> {
        if principal.is_anonymous() {
            return Ok(false);
        }
        if self.checks.blog_banned(principal, blog).await? {
            return Ok(false);
        }
        Ok(!self.checks.fandom_banned(principal, fandom).await?)
    }

    /// Edit a post or read its history
    pub async fn can_edit_post(
        &self,
        principal: UserId,
        owner: UserId,
        blog: BlogId,
        fandom: FandomId,
    ) -> Result<bool, AuthError> {
        self.can_edit_content(principal, owner, blog, fandom, BlogFlag::EditP, FandomFlag::EditP)
            .await
    }

    /// Edit a comment or read its history
    pub async fn can_edit_comment(
        &self,
        principal: UserId,
        owner: UserId,
        blog: BlogId,
        fandom: FandomId,
    ) -> Result<bool, AuthError> {
        self.can_edit_content(principal, owner, blog, fandom, BlogFlag::EditC, FandomFlag::EditC)
            .await
    }

    /// Edit a user profile or read its history: the account itself or an
    /// admin
    pub async fn can_edit_profile(
        &self,
        principal: UserId,
        target: UserId,
    ) -> Result<bool, AuthError> {
        if !principal.is_anonymous() && principal == target {
            return Ok(true);
        }
        self.is_admin(principal).await
    }

    /// Full vote listings are admin-only; everyone else sees their own
    /// vote
    pub async fn can_view_votes(&self, principal: UserId) -> Result<bool, AuthError> {
        self.is_admin(principal).await
    }

    /// Shared shape of the content-edit predicates: content owner, blog
    /// owner, blog grant, fandom grant (upward fallback), admin.
    async fn can_edit_content(
        &self,
        principal: UserId,
        owner: UserId,
        blog: BlogId,
        fandom: FandomId,
        blog_flag: BlogFlag,
        fandom_flag: FandomFlag,
    ) -> Result<bool, AuthError> {
        if principal.is_anonymous() {
            return Ok(false);
        }
        if principal == owner {
            return Ok(true);
        }
        if self.blog_owner(principal, blog).await? {
            return Ok(true);
        }
        if self.blog_moder(principal, blog, Some(blog_flag)).await? {
            return Ok(true);
        }
        if self
            .fandom_moder(principal, fandom, Some(fandom_flag))
            .await?
        {
            return Ok(true);
        }
        self.is_admin(principal).await
    }
}

impl<A: AccessCheckRepository> std::fmt::Debug for PermissionResolver<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver").finish()
    }
}
