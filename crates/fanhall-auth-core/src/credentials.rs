//! Credential storage: password hashing and the revocation nonce
//!
//! Passwords are hashed with PBKDF2-SHA256 in PHC string format. The
//! per-account revocation nonce is a random UUID regenerated on
//! invalidate and password change; every refresh token embeds the nonce
//! current at mint time, so rotating it revokes all outstanding refresh
//! tokens without a revocation list.

use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::Pbkdf2;
use rand_core::OsRng;
use std::sync::Arc;
use uuid::Uuid;

use fanhall_db::{CreateAccount, CredentialRepository, DbError};
use fanhall_types::UserId;

use crate::error::AuthError;

/// Credential store over a credential repository
pub struct CredentialStore<C: CredentialRepository> {
    repo: Arc<C>,
    /// Verified against when the username does not exist, so lookup
    /// failure and hash mismatch take the same time
    dummy_hash: String,
}

impl<C: CredentialRepository> CredentialStore<C> {
    /// Create a new credential store
    pub fn new(repo: Arc<C>) -> Result<Self, AuthError> {
        let dummy_hash = hash_password("fanhall-dummy-credential")?;
        Ok(Self { repo, dummy_hash })
    }

    /// Register a new account, returning its id
    pub async fn register(&self, username: &str, password: &str) -> Result<UserId, AuthError> {
        let password_hash = hash_password(password)?;

        self.repo
            .create_account(CreateAccount {
                username: username.to_string(),
                password_hash,
            })
            .await
            .map_err(|err| match err {
                DbError::UniqueViolation { .. } => AuthError::UsernameAlreadyTaken,
                other => other.into(),
            })
    }

    /// Verify a username/password pair, returning the account id and its
    /// current revocation nonce.
    ///
    /// Unknown usernames and wrong passwords both fail with `AuthFail`.
    pub async fn verify(&self, username: &str, password: &str) -> Result<(UserId, Uuid), AuthError> {
        match self.repo.find_by_username(username).await? {
            Some(row) => {
                if verify_password(password, &row.password_hash) {
                    Ok((UserId(row.id), row.nonce))
                } else {
                    Err(AuthError::AuthFail)
                }
            }
            None => {
                // Burn a verification against the dummy hash so the
                // unknown-user path is not observably faster.
                let _ = verify_password(password, &self.dummy_hash);
                Err(AuthError::AuthFail)
            }
        }
    }

    /// Current revocation nonce for an account
    pub async fn nonce(&self, id: UserId) -> Result<Option<Uuid>, AuthError> {
        Ok(self.repo.nonce(id).await?)
    }

    /// Regenerate the revocation nonce, revoking all outstanding refresh
    /// tokens
    pub async fn rotate_nonce(&self, id: UserId) -> Result<(), AuthError> {
        Ok(self.repo.rotate_nonce(id).await?)
    }

    /// Replace the password, rotating the nonce in the same row update
    pub async fn change_password(&self, id: UserId, new_password: &str) -> Result<(), AuthError> {
        let password_hash = hash_password(new_password)?;
        Ok(self
            .repo
            .rotate_nonce_and_set_password(id, &password_hash)
            .await?)
    }
}

impl<C: CredentialRepository> std::fmt::Debug for CredentialStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

/// Hash a password into PHC string format with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Pbkdf2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Internal(format!("password hashing failed: {err}")))
}

/// Verify a password against a PHC hash string.
///
/// Unparseable hashes verify as false rather than erroring; a corrupt
/// stored hash must not be distinguishable from a wrong password.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Pbkdf2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
