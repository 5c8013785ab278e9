//! Fanhall DB - Database abstractions
//!
//! SQLx-based database layer for Fanhall services.
//!
//! # Example
//!
//! ```rust,ignore
//! use fanhall_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/fanhall").await?;
//! let repos = Repositories::new(pool);
//!
//! let fandoms = repos.fandoms.list().await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;
