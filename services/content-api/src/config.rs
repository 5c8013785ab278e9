//! Configuration for the content API service.

use fanhall_auth_core::AuthConfig;
use std::time::Duration;

/// Content API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Auth core configuration
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Three distinct secrets, each at least 32 bytes
        let access_key = secret("ACCESS_TOKEN_KEY")?;
        let refresh_key = secret("REFRESH_TOKEN_KEY")?;
        let origin_key = secret("ORIGIN_KEY")?;

        let access_ttl_secs: u64 = std::env::var("ACCESS_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "600".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_TTL_SECS"))?;

        let refresh_ttl_secs: u64 = std::env::var("REFRESH_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| (28 * 24 * 3600).to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REFRESH_TOKEN_TTL_SECS"))?;

        let auth = AuthConfig::new(access_key, refresh_key, origin_key)
            .with_access_ttl(Duration::from_secs(access_ttl_secs))
            .with_refresh_ttl(Duration::from_secs(refresh_ttl_secs));

        Ok(Self {
            http_port,
            database_url,
            auth,
        })
    }
}

fn secret(name: &'static str) -> Result<String, ConfigError> {
    let value = std::env::var(name).map_err(|_| ConfigError::Missing(name))?;
    if value.len() < 32 {
        return Err(ConfigError::TooShort(name));
    }
    Ok(value)
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("{0} must be at least 32 bytes")]
    TooShort(&'static str),
}
