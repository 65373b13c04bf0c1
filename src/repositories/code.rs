//! Promotion-code repository
//!
//! Codes are single-use. Consumption is a single atomic
//! delete-if-exists: only the request whose DELETE removed the row may
//! proceed to promote, so two concurrent redemptions of the same code
//! cannot both succeed.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

/// Typed interface for the promotion-code store
#[async_trait]
pub trait CodeRepository: Send + Sync {
    /// Atomically delete the code; true means this caller consumed it
    async fn consume(&self, code: &str) -> Result<bool>;

    /// Insert a code (seeding; codes are otherwise created externally)
    async fn insert(&self, code: &str) -> Result<()>;
}

/// PostgreSQL-backed promotion-code repository
pub struct PgCodeRepository {
    pool: PgPool,
}

impl PgCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CodeRepository for PgCodeRepository {
    async fn consume(&self, code: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM promotion_codes
            WHERE code = $1
            "#,
        )
        .bind(code)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert(&self, code: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO promotion_codes (code)
            VALUES ($1)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(code)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
