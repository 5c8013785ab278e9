//! Application state

use std::sync::Arc;

use fanhall_auth_core::{BanGuard, PermissionResolver, TokenService};
use fanhall_db::pg::{
    PgAccessCheckRepository, PgCredentialRepository, PgModerationRepository,
};
use fanhall_db::Repositories;

use crate::config::Config;

/// Token service with concrete repository types
pub type TokenServiceImpl = TokenService<PgCredentialRepository>;
/// Permission resolver with concrete repository types
pub type PermissionResolverImpl = PermissionResolver<PgAccessCheckRepository>;
/// Ban guard with concrete repository types
pub type BanGuardImpl = BanGuard<PgAccessCheckRepository, PgModerationRepository>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Token issuing and validation
    pub tokens: Arc<TokenServiceImpl>,
    /// Cascading authorization checks
    pub resolver: PermissionResolverImpl,
    /// Grant/ban mutual-exclusion guard
    pub guard: Arc<BanGuardImpl>,
    /// Database repositories
    pub repos: Repositories,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(tokens: TokenServiceImpl, repos: Repositories, config: Config) -> Self {
        let checks = Arc::new(repos.checks.clone());
        let moderation = Arc::new(repos.moderation.clone());

        Self {
            tokens: Arc::new(tokens),
            resolver: PermissionResolver::new(Arc::clone(&checks)),
            guard: Arc::new(BanGuard::new(checks, moderation)),
            repos,
            config: Arc::new(config),
        }
    }
}
