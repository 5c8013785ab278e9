//! Token service: issues and validates the two token classes
//!
//! Access tokens (`II4s`: expiry, account id, origin fingerprint) are
//! short-lived and have no server-side revocation. Refresh tokens
//! (`II16s`: expiry, account id, revocation nonce) are long-lived and
//! verify only while their embedded nonce still matches the account's
//! stored nonce. The two classes are signed with distinct keys.

use std::sync::Arc;
use std::time::Duration;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use fanhall_db::CredentialRepository;
use fanhall_types::UserId;

use crate::config::AuthConfig;
use crate::credentials::CredentialStore;
use crate::crypto::{constant_time_eq, origin_fingerprint, HmacKey};
use crate::error::AuthError;
use crate::token::{decode_timed, encode_timed, Field, Layout};

/// Caller-visible fields of an access token: account id + fingerprint
const ACCESS_LAYOUT: &str = "I4s";
/// Caller-visible fields of a refresh token: account id + nonce
const REFRESH_LAYOUT: &str = "I16s";

/// An access/refresh token pair minted at login
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token issuing and validation service
pub struct TokenService<C: CredentialRepository> {
    credentials: CredentialStore<C>,
    access_key: HmacKey,
    refresh_key: HmacKey,
    origin_key: HmacKey,
    access_layout: Layout,
    refresh_layout: Layout,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl<C: CredentialRepository> TokenService<C> {
    /// Create a new token service.
    ///
    /// # Errors
    /// Fails if any configured secret is shorter than 32 bytes.
    pub fn new(config: AuthConfig, repo: Arc<C>) -> Result<Self, AuthError> {
        let key = |secret: &str| {
            HmacKey::new(secret)
                .map_err(|err| AuthError::Internal(format!("bad signing key: {err}")))
        };

        Ok(Self {
            credentials: CredentialStore::new(repo)?,
            access_key: key(&config.access_key)?,
            refresh_key: key(&config.refresh_key)?,
            origin_key: key(&config.origin_key)?,
            access_layout: Layout::parse(ACCESS_LAYOUT)?,
            refresh_layout: Layout::parse(REFRESH_LAYOUT)?,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        })
    }

    /// The credential store backing this service
    pub fn credentials(&self) -> &CredentialStore<C> {
        &self.credentials
    }

    /// Register a new account
    pub async fn register(&self, username: &str, password: &str) -> Result<UserId, AuthError> {
        self.credentials.register(username, password).await
    }

    /// Verify credentials and mint a fresh token pair
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        origin: &str,
    ) -> Result<TokenPair, AuthError> {
        let (user, nonce) = self.credentials.verify(username, password).await?;

        Ok(TokenPair {
            access_token: self.mint_access(user, origin)?,
            refresh_token: self.mint_refresh(user, nonce)?,
        })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// A refresh token whose embedded nonce no longer matches the
    /// account's stored nonce has been revoked and fails exactly like a
    /// forged one.
    pub async fn refresh(&self, refresh_token: &str, origin: &str) -> Result<String, AuthError> {
        let fields = decode_timed(refresh_token, &self.refresh_key)?;
        let (user, embedded) = match &fields[..] {
            [id, nonce] => match (id.as_u32(), nonce.as_bytes()) {
                (Some(id), Some(nonce)) => (UserId(i64::from(id)), nonce),
                _ => return Err(AuthError::InvalidToken),
            },
            _ => return Err(AuthError::InvalidToken),
        };

        let current = self
            .credentials
            .nonce(user)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !bool::from(current.as_bytes().ct_eq(embedded)) {
            return Err(AuthError::InvalidToken);
        }

        self.mint_access(user, origin)
    }

    /// Verify an access token against the live request origin, returning
    /// the authenticated account id. Pure computation; no I/O.
    pub fn verify_access(&self, access_token: &str, origin: &str) -> Result<UserId, AuthError> {
        let fields = decode_timed(access_token, &self.access_key)?;
        let (user, embedded) = match &fields[..] {
            [id, fp] => match (id.as_u32(), fp.as_bytes()) {
                (Some(id), Some(fp)) => (UserId(i64::from(id)), fp),
                _ => return Err(AuthError::InvalidToken),
            },
            _ => return Err(AuthError::InvalidToken),
        };

        let expected = origin_fingerprint(&self.origin_key, origin);
        if !constant_time_eq(embedded, &expected) {
            return Err(AuthError::InvalidToken);
        }

        Ok(user)
    }

    /// Verify credentials and rotate the nonce: every outstanding
    /// refresh token stops validating. Outstanding access tokens keep
    /// working until their own short expiry.
    pub async fn invalidate(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let (user, _) = self.credentials.verify(username, password).await?;
        self.credentials.rotate_nonce(user).await
    }

    /// Verify old credentials, then atomically rotate the nonce and set
    /// the new password hash.
    pub async fn change_password(
        &self,
        username: &str,
        password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let (user, _) = self.credentials.verify(username, password).await?;
        self.credentials.change_password(user, new_password).await
    }

    fn mint_access(&self, user: UserId, origin: &str) -> Result<String, AuthError> {
        let id = token_id(user)?;
        let fp = origin_fingerprint(&self.origin_key, origin);

        encode_timed(
            &self.access_layout,
            &[Field::U32(id), Field::Bytes(fp.to_vec())],
            &self.access_key,
            self.access_ttl,
        )
    }

    fn mint_refresh(&self, user: UserId, nonce: Uuid) -> Result<String, AuthError> {
        let id = token_id(user)?;

        encode_timed(
            &self.refresh_layout,
            &[Field::U32(id), Field::Bytes(nonce.as_bytes().to_vec())],
            &self.refresh_key,
            self.refresh_ttl,
        )
    }
}

impl<C: CredentialRepository> std::fmt::Debug for TokenService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

/// Account ids travel as unsigned 32-bit token fields
fn token_id(user: UserId) -> Result<u32, AuthError> {
    u32::try_from(user.0)
        .map_err(|_| AuthError::Internal(format!("account id {} exceeds token range", user.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_id_range() {
        assert_eq!(token_id(UserId(1)).unwrap(), 1);
        assert_eq!(token_id(UserId(u32::MAX as i64)).unwrap(), u32::MAX);
        assert!(token_id(UserId(u32::MAX as i64 + 1)).is_err());
        assert!(token_id(UserId(-1)).is_err());
    }
}
