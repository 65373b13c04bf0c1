//! Question repository
//!
//! Question templates are a secondary entity in the store: seeded
//! externally, persisted here, not exposed through the API.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

/// Question template record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuestionRecord {
    pub id: i64,
    pub question: String,
    pub linked_objects: Json<Vec<String>>,
}

/// Typed interface for the question store
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn insert(&self, record: &QuestionRecord) -> Result<()>;

    async fn find_by_id(&self, id: i64) -> Result<Option<QuestionRecord>>;
}

/// PostgreSQL-backed question repository
pub struct PgQuestionRepository {
    pool: PgPool,
}

impl PgQuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    async fn insert(&self, record: &QuestionRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO questions (id, question, linked_objects)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET question = EXCLUDED.question,
                linked_objects = EXCLUDED.linked_objects
            "#,
        )
        .bind(record.id)
        .bind(&record.question)
        .bind(&record.linked_objects)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<QuestionRecord>> {
        let question = sqlx::query_as::<_, QuestionRecord>(
            r#"
            SELECT id, question, linked_objects
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }
}
