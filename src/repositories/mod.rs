//! Store repositories
//!
//! One typed repository per persisted entity. Services and the GraphQL
//! surface depend on the traits only; the Postgres implementations are
//! wired in at startup.

pub mod account;
pub mod code;
#[cfg(test)]
pub mod memory;
pub mod question;

pub use account::{AccountRecord, AccountRepository, PgAccountRepository};
pub use code::{CodeRepository, PgCodeRepository};
pub use question::{PgQuestionRepository, QuestionRecord, QuestionRepository};
