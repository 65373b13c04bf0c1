//! In-memory repository implementations for tests
//!
//! Mirror the atomicity guarantees of the Postgres implementations:
//! account creation and code consumption each happen under a single
//! lock, so racing callers see exactly one winner.

use super::account::{AccountRecord, AccountRepository};
use super::code::CodeRepository;
use super::question::{QuestionRecord, QuestionRepository};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory account store
#[derive(Default)]
pub struct MemoryAccountRepository {
    accounts: Mutex<HashMap<String, AccountRecord>>,
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn create(&self, username: &str, password_hash: &str) -> Result<Option<AccountRecord>> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(username) {
            return Ok(None);
        }

        let now = Utc::now();
        let record = AccountRecord {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            teacher: false,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(username.to_string(), record.clone());
        Ok(Some(record))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AccountRecord>> {
        Ok(self.accounts.lock().unwrap().get(username).cloned())
    }

    async fn list(&self) -> Result<Vec<AccountRecord>> {
        let mut accounts: Vec<_> = self.accounts.lock().unwrap().values().cloned().collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(accounts)
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> Result<bool> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.get_mut(username) {
            Some(record) => {
                record.password_hash = password_hash.to_string();
                record.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_teacher(&self, username: &str, teacher: bool) -> Result<Option<AccountRecord>> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.get_mut(username) {
            Some(record) => {
                record.teacher = teacher;
                record.updated_at = Utc::now();
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }
}

/// In-memory promotion-code store
#[derive(Default)]
pub struct MemoryCodeRepository {
    codes: Mutex<HashSet<String>>,
}

#[async_trait]
impl CodeRepository for MemoryCodeRepository {
    async fn consume(&self, code: &str) -> Result<bool> {
        Ok(self.codes.lock().unwrap().remove(code))
    }

    async fn insert(&self, code: &str) -> Result<()> {
        self.codes.lock().unwrap().insert(code.to_string());
        Ok(())
    }
}

/// In-memory question store
#[derive(Default)]
pub struct MemoryQuestionRepository {
    questions: Mutex<HashMap<i64, QuestionRecord>>,
}

#[async_trait]
impl QuestionRepository for MemoryQuestionRepository {
    async fn insert(&self, record: &QuestionRecord) -> Result<()> {
        self.questions
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<QuestionRecord>> {
        Ok(self.questions.lock().unwrap().get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    #[tokio::test]
    async fn test_create_is_first_writer_wins() {
        let repo = MemoryAccountRepository::default();

        let first = repo.create("alice", "hash-1").await.unwrap();
        assert!(first.is_some());

        let second = repo.create("alice", "hash-2").await.unwrap();
        assert!(second.is_none());

        // Original record untouched
        let stored = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "hash-1");
    }

    #[tokio::test]
    async fn test_consume_is_single_use() {
        let repo = MemoryCodeRepository::default();
        repo.insert("golden-ticket").await.unwrap();

        assert!(repo.consume("golden-ticket").await.unwrap());
        assert!(!repo.consume("golden-ticket").await.unwrap());
        assert!(!repo.consume("never-existed").await.unwrap());
    }

    #[tokio::test]
    async fn test_question_round_trip() {
        let repo = MemoryQuestionRepository::default();
        let record = QuestionRecord {
            id: 7,
            question: "Which hall holds the fossils?".to_string(),
            linked_objects: Json(vec!["hall-3".to_string()]),
        };

        repo.insert(&record).await.unwrap();
        let found = repo.find_by_id(7).await.unwrap().unwrap();
        assert_eq!(found.question, record.question);
        assert!(repo.find_by_id(8).await.unwrap().is_none());
    }
}
