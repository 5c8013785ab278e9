//! PostgreSQL credential repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use fanhall_types::UserId;

use crate::error::DbResult;
use crate::models::CredentialRow;
use crate::repo::{CreateAccount, CredentialRepository};

/// PostgreSQL credential repository
#[derive(Clone)]
pub struct PgCredentialRepository {
    pool: PgPool,
}

impl PgCredentialRepository {
    /// Create a new credential repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialRepository for PgCredentialRepository {
    async fn create_account(&self, account: CreateAccount) -> DbResult<UserId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(UserId(id))
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<CredentialRow>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, password_hash, nonce
            FROM users
            WHERE username = $1::CITEXT
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn nonce(&self, id: UserId) -> DbResult<Option<Uuid>> {
        let nonce = sqlx::query_scalar("SELECT nonce FROM users WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        Ok(nonce)
    }

    async fn rotate_nonce(&self, id: UserId) -> DbResult<()> {
        sqlx::query("UPDATE users SET nonce = gen_random_uuid() WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_password(&self, id: UserId, password_hash: &str) -> DbResult<()> {
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn rotate_nonce_and_set_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> DbResult<()> {
        // Single row update: a concurrent login sees either the old
        // hash with the old nonce or the new hash with the new nonce.
        sqlx::query(
            "UPDATE users SET nonce = gen_random_uuid(), password_hash = $1 WHERE id = $2",
        )
        .bind(password_hash)
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
