//! Grant/ban mutual-exclusion guard
//!
//! An account holding a moderation grant at a scope must not
//! simultaneously hold a ban there, and vice versa. The pre-checks here
//! give precise conflict errors; the uniqueness constraint on the
//! grant/ban tables is the authoritative signal under races, so a
//! violation on insert maps to the matching conflict, never to a generic
//! failure.

use std::sync::Arc;

use fanhall_db::{
    AccessCheckRepository, BlogBan, BlogGrant, FandomBan, FandomGrant, ModerationRepository,
};
use fanhall_types::{BlogId, FandomId, ScopeKind, UserId};

use crate::error::AuthError;
use crate::permission::{authorize, PermissionResolver};

/// Guard in front of every grant/ban mutation
pub struct BanGuard<A: AccessCheckRepository, M: ModerationRepository> {
    checks: Arc<A>,
    moderation: Arc<M>,
    resolver: PermissionResolver<A>,
}

impl<A: AccessCheckRepository, M: ModerationRepository> BanGuard<A, M> {
    /// Create a new guard
    pub fn new(checks: Arc<A>, moderation: Arc<M>) -> Self {
        let resolver = PermissionResolver::new(Arc::clone(&checks));
        Self {
            checks,
            moderation,
            resolver,
        }
    }

    // ========================================================================
    // Fandom scope
    // ========================================================================

    /// Grant a fandom moderation role
    pub async fn grant_fandom_moder(
        &self,
        actor: UserId,
        grant: FandomGrant,
    ) -> Result<(), AuthError> {
        authorize(
            self.resolver
                .can_manage_fandom_moders(actor, grant.fandom_id)
                .await?,
        )?;

        if !self.checks.user_exists(grant.user_id).await? {
            return Err(AuthError::ObjectNotFound);
        }
        if self
            .checks
            .fandom_banned(grant.user_id, grant.fandom_id)
            .await?
        {
            return Err(AuthError::UserIsBanned(ScopeKind::Fandom));
        }

        match self.moderation.insert_fandom_moder(grant).await {
            Err(err) if err.is_unique_violation() => {
                Err(AuthError::UserIsModer(ScopeKind::Fandom))
            }
            other => Ok(other?),
        }
    }

    /// Update a fandom moderator's flags
    pub async fn update_fandom_moder(
        &self,
        actor: UserId,
        grant: FandomGrant,
    ) -> Result<(), AuthError> {
        authorize(
            self.resolver
                .can_manage_fandom_moders(actor, grant.fandom_id)
                .await?,
        )?;

        Ok(self.moderation.update_fandom_moder(grant).await?)
    }

    /// Revoke a fandom moderation role
    pub async fn revoke_fandom_moder(
        &self,
        actor: UserId,
        fandom: FandomId,
        target: UserId,
    ) -> Result<(), AuthError> {
        authorize(self.resolver.can_manage_fandom_moders(actor, fandom).await?)?;

        Ok(self.moderation.delete_fandom_moder(fandom, target).await?)
    }

    /// Ban a user at fandom scope
    pub async fn ban_fandom_user(&self, actor: UserId, ban: FandomBan) -> Result<(), AuthError> {
        authorize(self.resolver.can_ban_in_fandom(actor, ban.fandom_id).await?)?;

        if !self.checks.user_exists(ban.user_id).await? {
            return Err(AuthError::ObjectNotFound);
        }
        if self
            .checks
            .fandom_moder(ban.user_id, ban.fandom_id, None)
            .await?
        {
            return Err(AuthError::UserIsModer(ScopeKind::Fandom));
        }

        match self.moderation.insert_fandom_ban(ban).await {
            Err(err) if err.is_unique_violation() => {
                Err(AuthError::UserIsBanned(ScopeKind::Fandom))
            }
            other => Ok(other?),
        }
    }

    /// Lift a fandom ban
    pub async fn lift_fandom_ban(
        &self,
        actor: UserId,
        fandom: FandomId,
        target: UserId,
    ) -> Result<(), AuthError> {
        authorize(self.resolver.can_ban_in_fandom(actor, fandom).await?)?;

        Ok(self.moderation.delete_fandom_ban(fandom, target).await?)
    }

    // ========================================================================
    // Blog scope
    // ========================================================================

    /// Grant a blog moderation role. The target must also be clear of a
    /// ban at the containing fandom.
    pub async fn grant_blog_moder(
        &self,
        actor: UserId,
        fandom: FandomId,
        grant: BlogGrant,
    ) -> Result<(), AuthError> {
        authorize(
            self.resolver
                .can_manage_blog_moders(actor, grant.blog_id)
                .await?,
        )?;

        if !self.checks.user_exists(grant.user_id).await? {
            return Err(AuthError::ObjectNotFound);
        }
        if self.checks.blog_owner(grant.user_id, grant.blog_id).await? {
            return Err(AuthError::UserIsOwner);
        }
        if self.checks.blog_banned(grant.user_id, grant.blog_id).await? {
            return Err(AuthError::UserIsBanned(ScopeKind::Blog));
        }
        if self.checks.fandom_banned(grant.user_id, fandom).await? {
            return Err(AuthError::UserIsBanned(ScopeKind::Fandom));
        }

        match self.moderation.insert_blog_moder(grant).await {
            Err(err) if err.is_unique_violation() => Err(AuthError::UserIsModer(ScopeKind::Blog)),
            other => Ok(other?),
        }
    }

    /// Update a blog moderator's flags
    pub async fn update_blog_moder(
        &self,
        actor: UserId,
        grant: BlogGrant,
    ) -> Result<(), AuthError> {
        authorize(
            self.resolver
                .can_manage_blog_moders(actor, grant.blog_id)
                .await?,
        )?;

        Ok(self.moderation.update_blog_moder(grant).await?)
    }

    /// Revoke a blog moderation role
    pub async fn revoke_blog_moder(
        &self,
        actor: UserId,
        blog: BlogId,
        target: UserId,
    ) -> Result<(), AuthError> {
        authorize(self.resolver.can_manage_blog_moders(actor, blog).await?)?;

        Ok(self.moderation.delete_blog_moder(blog, target).await?)
    }

    /// Ban a user at blog scope. The target must not hold a grant at the
    /// blog or its containing fandom, and must not own the blog.
    pub async fn ban_blog_user(
        &self,
        actor: UserId,
        fandom: FandomId,
        ban: BlogBan,
    ) -> Result<(), AuthError> {
        authorize(self.resolver.can_ban_in_blog(actor, ban.blog_id).await?)?;

        if !self.checks.user_exists(ban.user_id).await? {
            return Err(AuthError::ObjectNotFound);
        }
        if self.checks.blog_owner(ban.user_id, ban.blog_id).await? {
            return Err(AuthError::UserIsOwner);
        }
        if self.checks.blog_moder(ban.user_id, ban.blog_id, None).await? {
            return Err(AuthError::UserIsModer(ScopeKind::Blog));
        }
        if self.checks.fandom_moder(ban.user_id, fandom, None).await? {
            return Err(AuthError::UserIsModer(ScopeKind::Fandom));
        }

        match self.moderation.insert_blog_ban(ban).await {
            Err(err) if err.is_unique_violation() => {
                Err(AuthError::UserIsBanned(ScopeKind::Blog))
            }
            other => Ok(other?),
        }
    }

    /// Lift a blog ban
    pub async fn lift_blog_ban(
        &self,
        actor: UserId,
        blog: BlogId,
        target: UserId,
    ) -> Result<(), AuthError> {
        authorize(self.resolver.can_ban_in_blog(actor, blog).await?)?;

        Ok(self.moderation.delete_blog_ban(blog, target).await?)
    }
}

impl<A: AccessCheckRepository, M: ModerationRepository> std::fmt::Debug for BanGuard<A, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BanGuard").finish()
    }
}
