//! Account repository
//!
//! Accounts are keyed by username. Uniqueness is enforced by the store
//! (`ON CONFLICT DO NOTHING` on the primary key), so a creation race
//! resolves to exactly one winner.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Account record from the store
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRecord {
    pub username: String,
    pub password_hash: String,
    pub teacher: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Typed CRUD interface for accounts
///
/// The API surface and services depend only on this trait, never on
/// the store's native query types.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account; returns `None` if the username is taken
    async fn create(&self, username: &str, password_hash: &str) -> Result<Option<AccountRecord>>;

    /// Find an account by username
    async fn find_by_username(&self, username: &str) -> Result<Option<AccountRecord>>;

    /// List all accounts
    async fn list(&self) -> Result<Vec<AccountRecord>>;

    /// Replace the password hash; returns false if the account is gone
    async fn update_password(&self, username: &str, password_hash: &str) -> Result<bool>;

    /// Set the teacher flag, returning the updated record
    async fn set_teacher(&self, username: &str, teacher: bool) -> Result<Option<AccountRecord>>;
}

/// PostgreSQL-backed account repository
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, username: &str, password_hash: &str) -> Result<Option<AccountRecord>> {
        let account = sqlx::query_as::<_, AccountRecord>(
            r#"
            INSERT INTO accounts (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            RETURNING username, password_hash, teacher, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AccountRecord>> {
        let account = sqlx::query_as::<_, AccountRecord>(
            r#"
            SELECT username, password_hash, teacher, created_at, updated_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn list(&self) -> Result<Vec<AccountRecord>> {
        let accounts = sqlx::query_as::<_, AccountRecord>(
            r#"
            SELECT username, password_hash, teacher, created_at, updated_at
            FROM accounts
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = $2, updated_at = NOW()
            WHERE username = $1
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_teacher(&self, username: &str, teacher: bool) -> Result<Option<AccountRecord>> {
        let account = sqlx::query_as::<_, AccountRecord>(
            r#"
            UPDATE accounts
            SET teacher = $2, updated_at = NOW()
            WHERE username = $1
            RETURNING username, password_hash, teacher, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(teacher)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}
