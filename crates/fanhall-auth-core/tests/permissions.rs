//! Permission resolver and ban guard integration tests: layering,
//! escalation, the fandom fallback and the grant/ban mutual exclusion.

mod common;

use std::sync::Arc;

use common::mock_repos::{shared_store, MockModerationStore};
use fanhall_auth_core::{AuthError, BanGuard, PermissionResolver};
use fanhall_db::{BlogBan, FandomBan, FandomGrant};
use fanhall_types::{BlogId, FandomId, ScopeKind, UserId};

const ADMIN: UserId = UserId(1);
const OWNER: UserId = UserId(2);
const MODER: UserId = UserId(3);
const MEMBER: UserId = UserId(4);
const ANON: UserId = UserId::ANONYMOUS;

const FANDOM: FandomId = FandomId(10);
const BLOG: BlogId = BlogId(20);

fn fixture() -> (
    PermissionResolver<MockModerationStore>,
    BanGuard<MockModerationStore, MockModerationStore>,
) {
    let store = shared_store();
    store.add_admin(ADMIN);
    store.add_user(MODER);
    store.add_user(MEMBER);
    store.add_blog(BLOG, OWNER);

    let resolver = PermissionResolver::new(Arc::clone(&store));
    let guard = BanGuard::new(Arc::clone(&store), store);
    (resolver, guard)
}

fn fandom_ban(target: UserId, set_by: UserId) -> FandomBan {
    FandomBan {
        user_id: target,
        fandom_id: FANDOM,
        set_by,
        reason: "spam".to_string(),
    }
}

fn blog_ban(target: UserId, set_by: UserId) -> BlogBan {
    BlogBan {
        user_id: target,
        blog_id: BLOG,
        set_by,
        reason: "spam".to_string(),
    }
}

// ============================================================================
// Resolver layering
// ============================================================================

#[tokio::test]
async fn test_admin_passes_every_check() {
    let (resolver, _) = fixture();

    assert!(resolver.can_create_fandom(ADMIN).await.unwrap());
    assert!(resolver.can_edit_fandom(ADMIN, FANDOM).await.unwrap());
    assert!(resolver.can_manage_fandom_moders(ADMIN, FANDOM).await.unwrap());
    assert!(resolver.can_ban_in_fandom(ADMIN, FANDOM).await.unwrap());
    assert!(resolver
        .can_edit_blog(ADMIN, BLOG, FANDOM, OWNER)
        .await
        .unwrap());
    assert!(resolver.can_manage_blog_moders(ADMIN, BLOG).await.unwrap());
    assert!(resolver.can_ban_in_blog(ADMIN, BLOG).await.unwrap());
    assert!(resolver
        .can_edit_post(ADMIN, MEMBER, BLOG, FANDOM)
        .await
        .unwrap());
    assert!(resolver
        .can_edit_comment(ADMIN, MEMBER, BLOG, FANDOM)
        .await
        .unwrap());
    assert!(resolver.can_edit_profile(ADMIN, MEMBER).await.unwrap());
    assert!(resolver.can_view_votes(ADMIN).await.unwrap());
}

#[tokio::test]
async fn test_anonymous_fails_every_check() {
    let (resolver, _) = fixture();

    assert!(!resolver.can_create_fandom(ANON).await.unwrap());
    assert!(!resolver.can_edit_fandom(ANON, FANDOM).await.unwrap());
    assert!(!resolver.can_create_blog(ANON, FANDOM).await.unwrap());
    assert!(!resolver
        .can_edit_blog(ANON, BLOG, FANDOM, OWNER)
        .await
        .unwrap());
    assert!(!resolver.can_publish(ANON, BLOG, FANDOM).await.unwrap());
    assert!(!resolver
        .can_edit_post(ANON, MEMBER, BLOG, FANDOM)
        .await
        .unwrap());
    // Even for "own" profile: anonymous is never a real account
    assert!(!resolver.can_edit_profile(ANON, ANON).await.unwrap());
}

#[tokio::test]
async fn test_ownership_layer() {
    let (resolver, _) = fixture();

    assert!(resolver
        .can_edit_blog(OWNER, BLOG, FANDOM, OWNER)
        .await
        .unwrap());
    // Blog owner can edit any post/comment in the blog
    assert!(resolver
        .can_edit_post(OWNER, MEMBER, BLOG, FANDOM)
        .await
        .unwrap());
    // Content owner can edit their own content
    assert!(resolver
        .can_edit_post(MEMBER, MEMBER, BLOG, FANDOM)
        .await
        .unwrap());
    // ...but not somebody else's
    assert!(!resolver
        .can_edit_post(MEMBER, OWNER, BLOG, FANDOM)
        .await
        .unwrap());
    // Profile: self, not others
    assert!(resolver.can_edit_profile(MEMBER, MEMBER).await.unwrap());
    assert!(!resolver.can_edit_profile(MEMBER, OWNER).await.unwrap());
}

#[tokio::test]
async fn test_grant_flags_are_specific() {
    let (resolver, guard) = fixture();

    let grant = FandomGrant {
        manage_f: false,
        ban_f: false,
        ..MockModerationStore::full_fandom_grant(MODER, FANDOM, ADMIN)
    };
    guard.grant_fandom_moder(ADMIN, grant).await.unwrap();

    assert!(resolver.can_edit_fandom(MODER, FANDOM).await.unwrap());
    assert!(!resolver.can_manage_fandom_moders(MODER, FANDOM).await.unwrap());
    assert!(!resolver.can_ban_in_fandom(MODER, FANDOM).await.unwrap());
}

#[tokio::test]
async fn test_fandom_moder_falls_through_to_blogs() {
    let (resolver, guard) = fixture();

    guard
        .grant_fandom_moder(
            ADMIN,
            MockModerationStore::full_fandom_grant(MODER, FANDOM, ADMIN),
        )
        .await
        .unwrap();

    // No blog-scope grant, but the fandom grant reaches down
    assert!(resolver
        .can_edit_blog(MODER, BLOG, FANDOM, OWNER)
        .await
        .unwrap());
    assert!(resolver
        .can_edit_post(MODER, MEMBER, BLOG, FANDOM)
        .await
        .unwrap());
    assert!(resolver
        .can_edit_comment(MODER, MEMBER, BLOG, FANDOM)
        .await
        .unwrap());
    // Blog moder management does not accept the fandom grant
    assert!(!resolver.can_manage_blog_moders(MODER, BLOG).await.unwrap());
}

#[tokio::test]
async fn test_bans_suppress_publishing() {
    let (resolver, guard) = fixture();

    assert!(resolver.can_publish(MEMBER, BLOG, FANDOM).await.unwrap());
    assert!(resolver.can_create_blog(MEMBER, FANDOM).await.unwrap());

    guard
        .ban_fandom_user(ADMIN, fandom_ban(MEMBER, ADMIN))
        .await
        .unwrap();

    assert!(!resolver.can_publish(MEMBER, BLOG, FANDOM).await.unwrap());
    assert!(!resolver.can_create_blog(MEMBER, FANDOM).await.unwrap());
}

// ============================================================================
// Guard: actor authorization
// ============================================================================

#[tokio::test]
async fn test_unprivileged_actor_cannot_grant_or_ban() {
    let (_, guard) = fixture();

    let err = guard
        .grant_fandom_moder(
            MEMBER,
            MockModerationStore::full_fandom_grant(MODER, FANDOM, MEMBER),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Forbidden));

    let err = guard
        .ban_fandom_user(MEMBER, fandom_ban(MODER, MEMBER))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Forbidden));

    let err = guard
        .ban_blog_user(MEMBER, FANDOM, blog_ban(MODER, MEMBER))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Forbidden));
}

#[tokio::test]
async fn test_blog_owner_manages_own_roster() {
    let (_, guard) = fixture();

    guard
        .grant_blog_moder(
            OWNER,
            FANDOM,
            MockModerationStore::full_blog_grant(MODER, BLOG, OWNER),
        )
        .await
        .unwrap();

    guard.revoke_blog_moder(OWNER, BLOG, MODER).await.unwrap();
}

#[tokio::test]
async fn test_grant_to_unknown_user_is_not_found() {
    let (_, guard) = fixture();

    let err = guard
        .grant_fandom_moder(
            ADMIN,
            MockModerationStore::full_fandom_grant(UserId(999), FANDOM, ADMIN),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::ObjectNotFound));
}

// ============================================================================
// Guard: mutual exclusion
// ============================================================================

#[tokio::test]
async fn test_granting_a_banned_user_conflicts() {
    let (_, guard) = fixture();

    guard
        .ban_fandom_user(ADMIN, fandom_ban(MEMBER, ADMIN))
        .await
        .unwrap();

    let err = guard
        .grant_fandom_moder(
            ADMIN,
            MockModerationStore::full_fandom_grant(MEMBER, FANDOM, ADMIN),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserIsBanned(ScopeKind::Fandom)));
}

#[tokio::test]
async fn test_banning_a_moder_conflicts() {
    let (_, guard) = fixture();

    guard
        .grant_fandom_moder(
            ADMIN,
            MockModerationStore::full_fandom_grant(MODER, FANDOM, ADMIN),
        )
        .await
        .unwrap();

    let err = guard
        .ban_fandom_user(ADMIN, fandom_ban(MODER, ADMIN))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserIsModer(ScopeKind::Fandom)));
}

#[tokio::test]
async fn test_duplicate_grant_maps_unique_violation() {
    let (_, guard) = fixture();

    guard
        .grant_fandom_moder(
            ADMIN,
            MockModerationStore::full_fandom_grant(MODER, FANDOM, ADMIN),
        )
        .await
        .unwrap();

    // Second insert loses to the uniqueness constraint, which is the
    // authoritative signal
    let err = guard
        .grant_fandom_moder(
            ADMIN,
            MockModerationStore::full_fandom_grant(MODER, FANDOM, ADMIN),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserIsModer(ScopeKind::Fandom)));
}

#[tokio::test]
async fn test_duplicate_ban_maps_unique_violation() {
    let (_, guard) = fixture();

    guard
        .ban_fandom_user(ADMIN, fandom_ban(MEMBER, ADMIN))
        .await
        .unwrap();

    // The target holds no grant, so the pre-checks pass; the insert
    // itself loses to the uniqueness constraint
    let err = guard
        .ban_fandom_user(ADMIN, fandom_ban(MEMBER, ADMIN))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserIsBanned(ScopeKind::Fandom)));
}

#[tokio::test]
async fn test_blog_grant_checks_parent_fandom_ban() {
    let (_, guard) = fixture();

    guard
        .ban_fandom_user(ADMIN, fandom_ban(MEMBER, ADMIN))
        .await
        .unwrap();

    let err = guard
        .grant_blog_moder(
            OWNER,
            FANDOM,
            MockModerationStore::full_blog_grant(MEMBER, BLOG, OWNER),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserIsBanned(ScopeKind::Fandom)));
}

#[tokio::test]
async fn test_blog_ban_checks_parent_fandom_grant() {
    let (_, guard) = fixture();

    guard
        .grant_fandom_moder(
            ADMIN,
            MockModerationStore::full_fandom_grant(MODER, FANDOM, ADMIN),
        )
        .await
        .unwrap();

    let err = guard
        .ban_blog_user(OWNER, FANDOM, blog_ban(MODER, OWNER))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserIsModer(ScopeKind::Fandom)));
}

#[tokio::test]
async fn test_blog_owner_cannot_be_granted_or_banned() {
    let (_, guard) = fixture();

    let err = guard
        .grant_blog_moder(
            ADMIN,
            FANDOM,
            MockModerationStore::full_blog_grant(OWNER, BLOG, ADMIN),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserIsOwner));

    let err = guard
        .ban_blog_user(ADMIN, FANDOM, blog_ban(OWNER, ADMIN))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserIsOwner));
}

#[tokio::test]
async fn test_lifting_ban_restores_grantability() {
    let (resolver, guard) = fixture();

    guard
        .ban_fandom_user(ADMIN, fandom_ban(MEMBER, ADMIN))
        .await
        .unwrap();
    guard.lift_fandom_ban(ADMIN, FANDOM, MEMBER).await.unwrap();

    guard
        .grant_fandom_moder(
            ADMIN,
            MockModerationStore::full_fandom_grant(MEMBER, FANDOM, ADMIN),
        )
        .await
        .unwrap();
    assert!(resolver.can_edit_fandom(MEMBER, FANDOM).await.unwrap());
}
