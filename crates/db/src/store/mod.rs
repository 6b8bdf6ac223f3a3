//! Storage seams for the FAQ service and the auth handlers.
//!
//! Two backends implement both traits:
//! - [`postgres::PgStore`] -- durable, delegates to the repositories
//! - [`memory::MemoryStore`] -- process-local, for development and tests

use async_trait::async_trait;
use polyfaq_core::types::DbId;
use thiserror::Error;

use crate::models::faq::{CreateFaq, CreateTranslation, Faq, FaqWithAdmin, UpdateFaq};
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated; carries the constraint name.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait FaqStore: Send + Sync {
    /// Every FAQ in `lang` with its creator's email, ordered by id.
    async fn list_faqs_by_language(&self, lang: &str) -> StoreResult<Vec<FaqWithAdmin>>;
    /// FAQs in `lang` whose creator is one of `creators`, ordered by id.
    async fn list_faqs_by_language_and_creators(
        &self,
        lang: &str,
        creators: &[DbId],
    ) -> StoreResult<Vec<Faq>>;
    async fn find_faq(&self, id: DbId) -> StoreResult<Option<Faq>>;
    async fn create_faq(&self, input: &CreateFaq) -> StoreResult<Faq>;
    /// `Ok(None)` when a translation for `(original_id, lang)` already
    /// exists, or when the source FAQ no longer exists or no longer has
    /// `source_updated_at`.
    async fn create_translation(&self, input: &CreateTranslation) -> StoreResult<Option<Faq>>;
    /// Replaces the text and drops every translation of the FAQ atomically.
    /// Returns the updated row and the number of translations removed.
    async fn update_faq(&self, id: DbId, input: &UpdateFaq) -> StoreResult<Option<(Faq, u64)>>;
    /// Deletes the FAQ and its translations. `false` if it did not exist.
    async fn delete_faq(&self, id: DbId) -> StoreResult<bool>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the email is taken.
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;
}

/// PostgreSQL unique violation.
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::Conflict(constraint);
            }
        }
        StoreError::Unexpected(anyhow::Error::new(err))
    }
}
