//! Durable store backed by PostgreSQL.

use async_trait::async_trait;
use polyfaq_core::types::DbId;

use super::{FaqStore, StoreResult, UserStore};
use crate::models::faq::{CreateFaq, CreateTranslation, Faq, FaqWithAdmin, UpdateFaq};
use crate::models::user::{CreateUser, User};
use crate::repositories::{FaqRepo, UserRepo};
use crate::DbPool;

/// Thin adapter from the store traits to the repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Close every pooled connection. Waits for checked-out connections to
    /// be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl FaqStore for PgStore {
    async fn list_faqs_by_language(&self, lang: &str) -> StoreResult<Vec<FaqWithAdmin>> {
        Ok(FaqRepo::list_by_language(&self.pool, lang).await?)
    }

    async fn list_faqs_by_language_and_creators(
        &self,
        lang: &str,
        creators: &[DbId],
    ) -> StoreResult<Vec<Faq>> {
        Ok(FaqRepo::list_by_language_and_creators(&self.pool, lang, creators).await?)
    }

    async fn find_faq(&self, id: DbId) -> StoreResult<Option<Faq>> {
        Ok(FaqRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_faq(&self, input: &CreateFaq) -> StoreResult<Faq> {
        Ok(FaqRepo::create(&self.pool, input).await?)
    }

    async fn create_translation(&self, input: &CreateTranslation) -> StoreResult<Option<Faq>> {
        Ok(FaqRepo::create_translation(&self.pool, input).await?)
    }

    async fn update_faq(&self, id: DbId, input: &UpdateFaq) -> StoreResult<Option<(Faq, u64)>> {
        Ok(FaqRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_faq(&self, id: DbId) -> StoreResult<bool> {
        Ok(FaqRepo::delete(&self.pool, id).await?)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }
}
