//! Token service integration tests: login, refresh, revocation and
//! origin binding against an in-memory credential repository.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::mock_repos::MockCredentialRepository;
use fanhall_auth_core::{AuthConfig, AuthError, TokenService};

const ORIGIN: &str = "203.0.113.7";
const OTHER_ORIGIN: &str = "198.51.100.23";

fn config() -> AuthConfig {
    AuthConfig::new(
        "access-signing-secret-at-least-32-bytes!",
        "refresh-signing-secret-at-least-32-byte!",
        "origin-fingerprint-secret-32-bytes-long!",
    )
}

fn service() -> TokenService<MockCredentialRepository> {
    TokenService::new(config(), Arc::new(MockCredentialRepository::new())).unwrap()
}

#[tokio::test]
async fn test_register_assigns_monotonic_ids() {
    let service = service();

    let alice = service.register("alice", "password123").await.unwrap();
    let bob = service.register("bob", "password123").await.unwrap();
    assert!(bob > alice);
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let service = service();

    service.register("alice", "password123").await.unwrap();
    let err = service.register("alice", "password123").await.unwrap_err();
    assert!(matches!(err, AuthError::UsernameAlreadyTaken));

    // CITEXT: case-insensitively unique
    let err = service.register("Alice", "password123").await.unwrap_err();
    assert!(matches!(err, AuthError::UsernameAlreadyTaken));
}

#[tokio::test]
async fn test_login_and_verify_access() {
    let service = service();

    let alice = service.register("alice", "password123").await.unwrap();
    let pair = service.login("alice", "password123", ORIGIN).await.unwrap();

    let principal = service.verify_access(&pair.access_token, ORIGIN).unwrap();
    assert_eq!(principal, alice);
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let service = service();
    service.register("alice", "password123").await.unwrap();

    // Wrong password and unknown user are the same error
    let err = service
        .login("alice", "wrong-password", ORIGIN)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AuthFail));

    let err = service
        .login("nobody", "password123", ORIGIN)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AuthFail));
}

#[tokio::test]
async fn test_access_token_is_origin_bound() {
    let service = service();
    service.register("alice", "password123").await.unwrap();

    let pair = service.login("alice", "password123", ORIGIN).await.unwrap();

    assert!(service.verify_access(&pair.access_token, ORIGIN).is_ok());
    let err = service
        .verify_access(&pair.access_token, OTHER_ORIGIN)
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken));
}

#[tokio::test]
async fn test_refresh_mints_usable_access_token() {
    let service = service();
    let alice = service.register("alice", "password123").await.unwrap();

    let pair = service.login("alice", "password123", ORIGIN).await.unwrap();
    let access = service.refresh(&pair.refresh_token, ORIGIN).await.unwrap();

    assert_eq!(service.verify_access(&access, ORIGIN).unwrap(), alice);
}

#[tokio::test]
async fn test_refresh_binds_new_access_to_live_origin() {
    let service = service();
    service.register("alice", "password123").await.unwrap();

    let pair = service.login("alice", "password123", ORIGIN).await.unwrap();
    // Refresh from a different network path: fine, but the new access
    // token is bound to that path
    let access = service
        .refresh(&pair.refresh_token, OTHER_ORIGIN)
        .await
        .unwrap();

    assert!(service.verify_access(&access, OTHER_ORIGIN).is_ok());
    assert!(service.verify_access(&access, ORIGIN).is_err());
}

#[tokio::test]
async fn test_tokens_are_not_interchangeable() {
    let service = service();
    service.register("alice", "password123").await.unwrap();

    let pair = service.login("alice", "password123", ORIGIN).await.unwrap();

    // Refresh token presented as an access token: distinct keys reject it
    let err = service
        .verify_access(&pair.refresh_token, ORIGIN)
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken));

    // Access token presented as a refresh token
    let err = service
        .refresh(&pair.access_token, ORIGIN)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken));
}

#[tokio::test]
async fn test_invalidate_revokes_outstanding_refresh_tokens() {
    let service = service();
    service.register("alice", "password123").await.unwrap();

    let before = service.login("alice", "password123", ORIGIN).await.unwrap();
    service.invalidate("alice", "password123").await.unwrap();

    // The pre-invalidate refresh token is revoked
    let err = service
        .refresh(&before.refresh_token, ORIGIN)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken));

    // A refresh token issued after invalidate works
    let after = service.login("alice", "password123", ORIGIN).await.unwrap();
    assert!(service.refresh(&after.refresh_token, ORIGIN).await.is_ok());
}

#[tokio::test]
async fn test_change_password_rotates_credentials_and_nonce() {
    let service = service();
    service.register("alice", "password123").await.unwrap();

    let before = service.login("alice", "password123", ORIGIN).await.unwrap();
    service
        .change_password("alice", "password123", "new-password456")
        .await
        .unwrap();

    // Old password no longer logs in
    let err = service
        .login("alice", "password123", ORIGIN)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AuthFail));

    // Old refresh token is revoked
    let err = service
        .refresh(&before.refresh_token, ORIGIN)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken));

    // New password works end to end
    let after = service
        .login("alice", "new-password456", ORIGIN)
        .await
        .unwrap();
    assert!(service.refresh(&after.refresh_token, ORIGIN).await.is_ok());
}

#[tokio::test]
async fn test_short_lived_access_token_expires() {
    let service = TokenService::new(
        config().with_access_ttl(Duration::ZERO),
        Arc::new(MockCredentialRepository::new()),
    )
    .unwrap();
    service.register("alice", "password123").await.unwrap();

    let pair = service.login("alice", "password123", ORIGIN).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let err = service.verify_access(&pair.access_token, ORIGIN).unwrap_err();
    assert!(matches!(err, AuthError::ExpiredToken));
}

#[tokio::test]
async fn test_garbage_tokens_rejected() {
    let service = service();

    for garbage in ["", "x", "a.b", "a.b.c.d", "not-a-token-at-all"] {
        let err = service.verify_access(garbage, ORIGIN).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken), "{garbage:?}");
    }
}
