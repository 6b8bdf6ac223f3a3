//! In-memory implementation of the FAQ and user stores.
//!
//! State lives in `BTreeMap`s behind a single `tokio::sync::RwLock`, so
//! iteration order is id order and every mutation is atomic with respect to
//! other callers. The constraints of the Postgres schema are mirrored:
//! - `uq_users_email` -> [`StoreError::Conflict`]
//! - `uq_faqs_original_lang` -> `create_translation` returns `Ok(None)`
//! - a translation is only stored while its source still has the
//!   `updated_at` it was translated from
//! - `created_by` must reference an existing user
//! - deleting an FAQ cascades to its translations
//! - updating an FAQ drops its translations in the same write
//!
//! Not durable: all state is lost when the process exits.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use polyfaq_core::language::CANONICAL_LANGUAGE;
use polyfaq_core::types::DbId;
use tokio::sync::RwLock;

use super::{FaqStore, StoreError, StoreResult, UserStore};
use crate::models::faq::{CreateFaq, CreateTranslation, Faq, FaqAdmin, FaqWithAdmin, UpdateFaq};
use crate::models::user::{CreateUser, User};

#[derive(Debug, Default)]
struct State {
    last_faq_id: DbId,
    faqs: BTreeMap<DbId, Faq>,
    last_user_id: DbId,
    users: BTreeMap<DbId, User>,
}

impl State {
    fn ensure_user(&self, id: DbId) -> StoreResult<&User> {
        self.users.get(&id).ok_or_else(|| {
            StoreError::Unexpected(anyhow::anyhow!(
                "foreign key violation: user {id} does not exist"
            ))
        })
    }

    fn insert_faq(
        &mut self,
        question: &str,
        answer: &str,
        lang: &str,
        created_by: DbId,
        original_id: Option<DbId>,
    ) -> Faq {
        self.last_faq_id += 1;
        let now = Utc::now();
        let faq = Faq {
            id: self.last_faq_id,
            question: question.to_string(),
            answer: answer.to_string(),
            lang: lang.to_string(),
            created_by,
            original_id,
            created_at: now,
            updated_at: now,
        };
        self.faqs.insert(faq.id, faq.clone());
        faq
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of FAQ rows, canonical and translated.
    pub async fn faq_count(&self) -> usize {
        self.state.read().await.faqs.len()
    }
}

#[async_trait]
impl FaqStore for MemoryStore {
    async fn list_faqs_by_language(&self, lang: &str) -> StoreResult<Vec<FaqWithAdmin>> {
        let state = self.state.read().await;
        state
            .faqs
            .values()
            .filter(|faq| faq.lang == lang)
            .map(|faq| {
                let admin = state.ensure_user(faq.created_by)?;
                Ok(FaqWithAdmin {
                    faq: faq.clone(),
                    admin: FaqAdmin {
                        email: admin.email.clone(),
                    },
                })
            })
            .collect()
    }

    async fn list_faqs_by_language_and_creators(
        &self,
        lang: &str,
        creators: &[DbId],
    ) -> StoreResult<Vec<Faq>> {
        let state = self.state.read().await;
        Ok(state
            .faqs
            .values()
            .filter(|faq| faq.lang == lang && creators.contains(&faq.created_by))
            .cloned()
            .collect())
    }

    async fn find_faq(&self, id: DbId) -> StoreResult<Option<Faq>> {
        Ok(self.state.read().await.faqs.get(&id).cloned())
    }

    async fn create_faq(&self, input: &CreateFaq) -> StoreResult<Faq> {
        let mut state = self.state.write().await;
        state.ensure_user(input.created_by)?;
        Ok(state.insert_faq(
            &input.question,
            &input.answer,
            CANONICAL_LANGUAGE,
            input.created_by,
            None,
        ))
    }

    async fn create_translation(&self, input: &CreateTranslation) -> StoreResult<Option<Faq>> {
        let mut state = self.state.write().await;
        state.ensure_user(input.created_by)?;

        let source_current = state
            .faqs
            .get(&input.original_id)
            .is_some_and(|source| source.updated_at == input.source_updated_at);
        if !source_current {
            return Ok(None);
        }

        let exists = state
            .faqs
            .values()
            .any(|faq| faq.original_id == Some(input.original_id) && faq.lang == input.lang);
        if exists {
            return Ok(None);
        }

        Ok(Some(state.insert_faq(
            &input.question,
            &input.answer,
            &input.lang,
            input.created_by,
            Some(input.original_id),
        )))
    }

    async fn update_faq(&self, id: DbId, input: &UpdateFaq) -> StoreResult<Option<(Faq, u64)>> {
        let mut state = self.state.write().await;
        let Some(faq) = state.faqs.get_mut(&id) else {
            return Ok(None);
        };
        faq.question = input.question.clone();
        faq.answer = input.answer.clone();
        // Strictly increasing, like the Postgres update.
        faq.updated_at = Utc::now().max(faq.updated_at + TimeDelta::nanoseconds(1));
        let updated = faq.clone();

        let before = state.faqs.len();
        state.faqs.retain(|_, faq| faq.original_id != Some(id));
        let stale = (before - state.faqs.len()) as u64;

        Ok(Some((updated, stale)))
    }

    async fn delete_faq(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.faqs.remove(&id).is_none() {
            return Ok(false);
        }
        state.faqs.retain(|_, faq| faq.original_id != Some(id));
        Ok(true)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::Conflict("uq_users_email".to_string()));
        }

        state.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.last_user_id,
            full_name: input.full_name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role.clone(),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }
}
