//! PostgreSQL repository implementations

mod blogs;
mod checks;
mod comments;
mod credentials;
mod fandoms;
mod moderation;
mod posts;
mod users;

pub use blogs::PgBlogRepository;
pub use checks::PgAccessCheckRepository;
pub use comments::PgCommentRepository;
pub use credentials::PgCredentialRepository;
pub use fandoms::PgFandomRepository;
pub use moderation::PgModerationRepository;
pub use posts::PgPostRepository;
pub use users::PgUserRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub credentials: PgCredentialRepository,
    pub checks: PgAccessCheckRepository,
    pub moderation: PgModerationRepository,
    pub users: PgUserRepository,
    pub fandoms: PgFandomRepository,
    pub blogs: PgBlogRepository,
    pub posts: PgPostRepository,
    pub comments: PgCommentRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            credentials: PgCredentialRepository::new(pool.clone()),
            checks: PgAccessCheckRepository::new(pool.clone()),
            moderation: PgModerationRepository::new(pool.clone()),
            users: PgUserRepository::new(pool.clone()),
            fandoms: PgFandomRepository::new(pool.clone()),
            blogs: PgBlogRepository::new(pool.clone()),
            posts: PgPostRepository::new(pool.clone()),
            comments: PgCommentRepository::new(pool),
        }
    }
}
