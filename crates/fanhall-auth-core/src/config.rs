//! Configuration types for the auth core

use std::time::Duration;

/// Auth core configuration.
///
/// Carries three distinct secrets: one per token class so compromise of
/// one signing key cannot forge the other, and a separate key for the
/// origin fingerprint so neither token key doubles as the fingerprint
/// key.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for access tokens
    pub access_key: String,
    /// HMAC secret for refresh tokens
    pub refresh_key: String,
    /// HMAC secret for the client-origin fingerprint
    pub origin_key: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
}

impl AuthConfig {
    /// Default access token lifetime: 10 minutes
    pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(10 * 60);
    /// Default refresh token lifetime: 28 days
    pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(28 * 24 * 60 * 60);

    /// Create a new auth config with default lifetimes
    pub fn new(
        access_key: impl Into<String>,
        refresh_key: impl Into<String>,
        origin_key: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            refresh_key: refresh_key.into(),
            origin_key: origin_key.into(),
            access_ttl: Self::DEFAULT_ACCESS_TTL,
            refresh_ttl: Self::DEFAULT_REFRESH_TTL,
        }
    }

    /// Set the access token lifetime
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Set the refresh token lifetime
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}
