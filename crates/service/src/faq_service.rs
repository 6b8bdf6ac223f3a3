//! FAQ orchestration.
//!
//! Read path (`get_faqs`):
//!
//! 1. Serve `faqs:<lang>` from the cache when present. No store access.
//! 2. Canonical language: list, cache, return.
//! 3. Other languages, under the single-flight guard for the key:
//!    find canonical FAQs without a translation in `lang` (gaps), translate
//!    question and answer of every gap concurrently, persist the results,
//!    then list, cache, return.
//!
//! A gap whose translation or insert fails is logged and skipped; it stays a
//! gap and is retried on the next cache-miss read. The cache is advisory:
//! every cache failure is logged and treated as a miss, and the service stays
//! correct when the cache stores nothing.
//!
//! Write paths validate input, mutate the store, and then drop the whole
//! `faqs:*` namespace, since a canonical change shifts the gap set of every
//! language.
//!
//! Reads race writes in two places, and both are closed here:
//! - A translation carries the `updated_at` of the canonical row it was made
//!   from, and the store refuses it once an update has replaced that text.
//! - Every write bumps a generation counter held in the cache before wiping
//!   the namespace. A read snapshots the generation before touching the
//!   store and only caches its listing if the generation is unchanged, so a
//!   listing computed before a write (in this process or another one sharing
//!   the cache) is never cached after it.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use polyfaq_cache::Cache;
use polyfaq_core::cache_keys::{
    faq_list_key, FAQ_CACHE_TTL_SECS, FAQ_GENERATION_KEY, FAQ_KEY_PATTERN,
};
use polyfaq_core::error::CoreError;
use polyfaq_core::language::{is_canonical, normalize_language, CANONICAL_LANGUAGE};
use polyfaq_core::types::DbId;
use polyfaq_db::models::faq::{CreateFaq, CreateTranslation, Faq, FaqWithAdmin, UpdateFaq};
use polyfaq_db::store::FaqStore;
use polyfaq_translate::Translator;

use crate::error::ServiceResult;
use crate::single_flight::SingleFlight;
use crate::stats::{ServiceStats, StatsSnapshot};

/// Validated question/answer pair for create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqDraft {
    pub question: String,
    pub answer: String,
}

impl FaqDraft {
    /// Both fields must be present and non-blank. Surrounding whitespace is
    /// trimmed.
    pub fn new(question: Option<&str>, answer: Option<&str>) -> Result<Self, CoreError> {
        let question = question.map(str::trim).unwrap_or_default();
        let answer = answer.map(str::trim).unwrap_or_default();

        let mut missing = Vec::new();
        if question.is_empty() {
            missing.push("question");
        }
        if answer.is_empty() {
            missing.push("answer");
        }
        if !missing.is_empty() {
            return Err(CoreError::missing_fields(&missing));
        }

        Ok(Self {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }
}

pub struct FaqService {
    store: Arc<dyn FaqStore>,
    cache: Arc<dyn Cache>,
    translator: Arc<dyn Translator>,
    cache_ttl: Duration,
    flights: SingleFlight,
    stats: ServiceStats,
}

impl FaqService {
    pub fn new(
        store: Arc<dyn FaqStore>,
        cache: Arc<dyn Cache>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            store,
            cache,
            translator,
            cache_ttl: Duration::from_secs(FAQ_CACHE_TTL_SECS),
            flights: SingleFlight::new(),
            stats: ServiceStats::default(),
        }
    }

    /// Override the listing TTL (defaults to one hour).
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// List FAQs in `lang` (canonical when `None`), translating any canonical
    /// FAQ that has no counterpart in `lang` yet.
    pub async fn get_faqs(&self, lang: Option<&str>) -> ServiceResult<Vec<FaqWithAdmin>> {
        let lang = normalize_language(lang)?;
        let key = faq_list_key(&lang);

        if let Some(faqs) = self.cached(&key).await {
            return Ok(faqs);
        }
        ServiceStats::incr(&self.stats.cache_misses);

        if is_canonical(&lang) {
            let generation = self.generation().await;
            let faqs = self.store.list_faqs_by_language(&lang).await?;
            self.populate(&key, &faqs, generation).await;
            return Ok(faqs);
        }

        let _flight = self.flights.acquire(&key).await;
        // A leader for the same key may have filled the cache while we waited.
        if let Some(faqs) = self.cached(&key).await {
            return Ok(faqs);
        }

        let generation = self.generation().await;
        self.fill_gaps(&lang).await?;

        let faqs = self.store.list_faqs_by_language(&lang).await?;
        self.populate(&key, &faqs, generation).await;
        Ok(faqs)
    }

    /// Translate every gap in `lang`. Returns how many translations were
    /// created.
    async fn fill_gaps(&self, lang: &str) -> ServiceResult<usize> {
        let canonical: Vec<Faq> = self
            .store
            .list_faqs_by_language(CANONICAL_LANGUAGE)
            .await?
            .into_iter()
            .map(|item| item.faq)
            .collect();
        if canonical.is_empty() {
            return Ok(0);
        }

        let mut creators: Vec<DbId> = canonical.iter().map(|faq| faq.created_by).collect();
        creators.sort_unstable();
        creators.dedup();

        let existing = self
            .store
            .list_faqs_by_language_and_creators(lang, &creators)
            .await?;

        let gaps = find_gaps(&canonical, &existing);
        if gaps.is_empty() {
            return Ok(0);
        }

        tracing::info!(lang = %lang, gaps = gaps.len(), "Translating missing FAQs");

        let created = join_all(gaps.into_iter().map(|faq| self.translate_gap(faq, lang)))
            .await
            .into_iter()
            .filter(|created| *created)
            .count();

        tracing::info!(lang = %lang, created, "Finished translating missing FAQs");
        Ok(created)
    }

    /// Translate and persist one gap. Failures are recorded, never raised.
    async fn translate_gap(&self, faq: &Faq, lang: &str) -> bool {
        let (question, answer) = tokio::join!(
            self.translator.translate(&faq.question, lang),
            self.translator.translate(&faq.answer, lang),
        );

        let (question, answer) = match (question, answer) {
            (Ok(question), Ok(answer)) => (question, answer),
            (Err(e), _) | (_, Err(e)) => {
                ServiceStats::incr(&self.stats.translation_failures);
                tracing::warn!(faq_id = faq.id, lang = %lang, error = %e, "FAQ translation failed");
                return false;
            }
        };

        let input = CreateTranslation {
            question,
            answer,
            lang: lang.to_string(),
            created_by: faq.created_by,
            original_id: faq.id,
            source_updated_at: faq.updated_at,
        };

        match self.store.create_translation(&input).await {
            Ok(Some(translation)) => {
                ServiceStats::incr(&self.stats.translations_created);
                tracing::debug!(
                    faq_id = faq.id,
                    translation_id = translation.id,
                    lang = %lang,
                    "Stored FAQ translation",
                );
                true
            }
            Ok(None) => {
                tracing::debug!(
                    faq_id = faq.id,
                    lang = %lang,
                    "Translation not stored: already present or source changed",
                );
                false
            }
            Err(e) => {
                ServiceStats::incr(&self.stats.translation_failures);
                tracing::warn!(faq_id = faq.id, lang = %lang, error = %e, "Failed to store FAQ translation");
                false
            }
        }
    }

    async fn cached(&self, key: &str) -> Option<Vec<FaqWithAdmin>> {
        let raw = match self.cache.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(faqs) => {
                ServiceStats::incr(&self.stats.cache_hits);
                Some(faqs)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Invalidation generation, or `None` if the cache cannot be read (in
    /// which case nothing is cached).
    async fn generation(&self) -> Option<u64> {
        match self.cache.counter(FAQ_GENERATION_KEY).await {
            Ok(generation) => Some(generation),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read FAQ cache generation");
                None
            }
        }
    }

    /// Cache `faqs` unless a write has bumped the generation since
    /// `generation` was read.
    async fn populate(&self, key: &str, faqs: &[FaqWithAdmin], generation: Option<u64>) {
        let Some(generation) = generation else {
            return;
        };
        let encoded = match serde_json::to_string(faqs) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to encode FAQ listing");
                return;
            }
        };

        match self
            .cache
            .set_ex_if_counter(key, &encoded, self.cache_ttl, FAQ_GENERATION_KEY, generation)
            .await
        {
            Ok(true) => {}
            Ok(false) => tracing::debug!(key = %key, generation, "FAQ listing not cached"),
            Err(e) => tracing::warn!(key = %key, error = %e, "Cache write failed"),
        }
    }

    /// Create a canonical FAQ authored by `creator`.
    pub async fn create_faq(&self, draft: FaqDraft, creator: DbId) -> ServiceResult<Faq> {
        let input = CreateFaq {
            question: draft.question,
            answer: draft.answer,
            created_by: creator,
        };
        let faq = self.store.create_faq(&input).await?;
        tracing::info!(faq_id = faq.id, user_id = creator, "FAQ created");

        self.invalidate_all().await;
        Ok(faq)
    }

    /// Replace a canonical FAQ's text. Its translations are dropped so the
    /// next read of each language regenerates them.
    pub async fn update_faq(&self, id: DbId, draft: FaqDraft) -> ServiceResult<Faq> {
        self.find_canonical(id).await?;

        let input = UpdateFaq {
            question: draft.question,
            answer: draft.answer,
        };
        let (faq, stale) = self
            .store
            .update_faq(id, &input)
            .await?
            .ok_or_else(|| CoreError::faq_not_found(id))?;
        tracing::info!(faq_id = id, stale_translations = stale, "FAQ updated");

        self.invalidate_all().await;
        Ok(faq)
    }

    /// Delete a canonical FAQ together with its translations.
    pub async fn delete_faq(&self, id: DbId) -> ServiceResult<()> {
        self.find_canonical(id).await?;

        if !self.store.delete_faq(id).await? {
            return Err(CoreError::faq_not_found(id).into());
        }
        tracing::info!(faq_id = id, "FAQ deleted");

        self.invalidate_all().await;
        Ok(())
    }

    async fn find_canonical(&self, id: DbId) -> ServiceResult<Faq> {
        let faq = self
            .store
            .find_faq(id)
            .await?
            .ok_or_else(|| CoreError::faq_not_found(id))?;
        if faq.is_translation() {
            return Err(CoreError::Validation(format!(
                "FAQ {id} is a translation; modify its canonical FAQ instead"
            ))
            .into());
        }
        Ok(faq)
    }

    async fn invalidate_all(&self) {
        // Bump first: a listing read before this write either lands before
        // the delete below or is refused by the generation check.
        if let Err(e) = self.cache.incr_counter(FAQ_GENERATION_KEY).await {
            tracing::warn!(error = %e, "Failed to bump FAQ cache generation");
        }
        match self.cache.delete_pattern(FAQ_KEY_PATTERN).await {
            Ok(removed) => tracing::debug!(removed, "Invalidated FAQ listings"),
            Err(e) => tracing::warn!(error = %e, "Failed to invalidate FAQ listings"),
        }
    }
}

/// Canonical FAQs with no translation among `existing`.
fn find_gaps<'a>(canonical: &'a [Faq], existing: &[Faq]) -> Vec<&'a Faq> {
    let translated_from: HashSet<DbId> = existing.iter().filter_map(|faq| faq.original_id).collect();
    canonical
        .iter()
        .filter(|faq| !translated_from.contains(&faq.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use polyfaq_cache::{MemoryCache, NoopCache};
    use polyfaq_db::models::user::CreateUser;
    use polyfaq_db::store::{MemoryStore, StoreError, StoreResult, UserStore};

    use super::*;
    use crate::testing::ScriptedTranslator;
    use crate::ServiceError;

    struct Harness {
        store: Arc<MemoryStore>,
        cache: Arc<MemoryCache>,
        translator: Arc<ScriptedTranslator>,
        service: FaqService,
        admin_id: DbId,
    }

    async fn harness() -> Harness {
        harness_with(ScriptedTranslator::new()).await
    }

    async fn harness_with(translator: ScriptedTranslator) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new());
        let translator = Arc::new(translator);
        let admin_id = seed_admin(&store).await;
        let service = FaqService::new(store.clone(), cache.clone(), translator.clone());
        Harness {
            store,
            cache,
            translator,
            service,
            admin_id,
        }
    }

    async fn seed_admin(store: &MemoryStore) -> DbId {
        store
            .create_user(&CreateUser {
                full_name: "Admin".into(),
                email: "admin@example.com".into(),
                password_hash: "hash".into(),
                role: "admin".into(),
            })
            .await
            .unwrap()
            .id
    }

    /// Delegates to a [`MemoryStore`] but fails every update.
    struct UpdateFailingStore(Arc<MemoryStore>);

    #[async_trait::async_trait]
    impl FaqStore for UpdateFailingStore {
        async fn list_faqs_by_language(&self, lang: &str) -> StoreResult<Vec<FaqWithAdmin>> {
            self.0.list_faqs_by_language(lang).await
        }

        async fn list_faqs_by_language_and_creators(
            &self,
            lang: &str,
            creators: &[DbId],
        ) -> StoreResult<Vec<Faq>> {
            self.0.list_faqs_by_language_and_creators(lang, creators).await
        }

        async fn find_faq(&self, id: DbId) -> StoreResult<Option<Faq>> {
            self.0.find_faq(id).await
        }

        async fn create_faq(&self, input: &CreateFaq) -> StoreResult<Faq> {
            self.0.create_faq(input).await
        }

        async fn create_translation(&self, input: &CreateTranslation) -> StoreResult<Option<Faq>> {
            self.0.create_translation(input).await
        }

        async fn update_faq(
            &self,
            _id: DbId,
            _input: &UpdateFaq,
        ) -> StoreResult<Option<(Faq, u64)>> {
            Err(StoreError::Unexpected(anyhow::anyhow!("connection reset")))
        }

        async fn delete_faq(&self, id: DbId) -> StoreResult<bool> {
            self.0.delete_faq(id).await
        }

        async fn health_check(&self) -> StoreResult<()> {
            Ok(())
        }

        fn backend_name(&self) -> &'static str {
            "update-failing"
        }
    }

    fn draft(question: &str, answer: &str) -> FaqDraft {
        FaqDraft::new(Some(question), Some(answer)).unwrap()
    }

    fn faq(id: DbId, lang: &str, original_id: Option<DbId>) -> Faq {
        let now = polyfaq_core::types::Timestamp::default();
        Faq {
            id,
            question: format!("q{id}"),
            answer: format!("a{id}"),
            lang: lang.into(),
            created_by: 1,
            original_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn gaps_are_canonical_faqs_without_translation() {
        let canonical = vec![faq(1, "en", None), faq(2, "en", None), faq(3, "en", None)];
        let existing = vec![faq(10, "hi", Some(2))];
        let gaps: Vec<DbId> = find_gaps(&canonical, &existing).iter().map(|f| f.id).collect();
        assert_eq!(gaps, vec![1, 3]);
    }

    #[test]
    fn draft_requires_both_fields() {
        assert_matches!(
            FaqDraft::new(None, Some("A")),
            Err(CoreError::Validation(msg)) if msg.contains("question")
        );
        assert_matches!(
            FaqDraft::new(Some("  "), Some("")),
            Err(CoreError::Validation(msg)) if msg.contains("question, answer")
        );
        assert_eq!(
            FaqDraft::new(Some(" Q? "), Some("A.")).unwrap(),
            FaqDraft {
                question: "Q?".into(),
                answer: "A.".into()
            }
        );
    }

    #[tokio::test]
    async fn canonical_read_never_translates() {
        let h = harness().await;
        h.service.create_faq(draft("Q1", "A1"), h.admin_id).await.unwrap();
        h.service.create_faq(draft("Q2", "A2"), h.admin_id).await.unwrap();

        let faqs = h.service.get_faqs(Some("en")).await.unwrap();
        assert_eq!(faqs.len(), 2);
        assert_eq!(faqs[0].admin.email, "admin@example.com");

        let defaulted = h.service.get_faqs(None).await.unwrap();
        assert_eq!(defaulted, faqs);
        assert_eq!(h.translator.calls(), 0);
    }

    #[tokio::test]
    async fn first_read_translates_each_faq_once_then_hits_cache() {
        let h = harness().await;
        let q1 = h.service.create_faq(draft("Q1", "A1"), h.admin_id).await.unwrap();
        let q2 = h.service.create_faq(draft("Q2", "A2"), h.admin_id).await.unwrap();

        let hindi = h.service.get_faqs(Some("hi")).await.unwrap();
        assert_eq!(h.translator.calls(), 4, "one question+answer pair per FAQ");
        assert_eq!(hindi.len(), 2);
        let originals: Vec<_> = hindi.iter().map(|f| f.faq.original_id).collect();
        assert_eq!(originals, vec![Some(q1.id), Some(q2.id)]);
        assert_eq!(hindi[0].faq.question, "[hi] Q1");
        assert_eq!(hindi[0].faq.answer, "[hi] A1");
        assert_eq!(hindi[0].faq.lang, "hi");
        assert_eq!(hindi[0].faq.created_by, h.admin_id);

        let again = h.service.get_faqs(Some("hi")).await.unwrap();
        assert_eq!(again, hindi);
        assert_eq!(h.translator.calls(), 4, "second read must be served from cache");
        assert_eq!(h.service.stats().translations_created, 2);
        assert!(h.service.stats().cache_hits >= 1);
    }

    #[tokio::test]
    async fn cache_hit_skips_store_entirely() {
        let h = harness().await;
        h.service.create_faq(draft("Q1", "A1"), h.admin_id).await.unwrap();
        h.service.get_faqs(Some("en")).await.unwrap();

        // Mutate the store behind the service's back: a cache hit must not see it.
        h.store
            .create_faq(&CreateFaq {
                question: "sneaky".into(),
                answer: "sneaky".into(),
                created_by: h.admin_id,
            })
            .await
            .unwrap();

        let cached = h.service.get_faqs(Some("en")).await.unwrap();
        assert_eq!(cached.len(), 1);
    }

    #[tokio::test]
    async fn failed_gap_is_skipped_and_retried_later() {
        let h = harness().await;
        h.service.create_faq(draft("Q1", "A1"), h.admin_id).await.unwrap();
        h.service.create_faq(draft("Broken", "A2"), h.admin_id).await.unwrap();
        h.translator.fail_on("Broken");

        let hindi = h.service.get_faqs(Some("hi")).await.unwrap();
        assert_eq!(hindi.len(), 1, "the failing gap is left out, the rest succeed");
        assert_eq!(hindi[0].faq.question, "[hi] Q1");
        assert_eq!(h.service.stats().translation_failures, 1);

        // Recover the provider and expire the cache: only the failed gap is retried.
        h.translator.recover("Broken");
        h.cache.delete_pattern("faqs:*").await.unwrap();
        let calls_before = h.translator.calls();

        let hindi = h.service.get_faqs(Some("hi")).await.unwrap();
        assert_eq!(hindi.len(), 2);
        assert_eq!(h.translator.calls() - calls_before, 2);
    }

    #[tokio::test]
    async fn mutations_invalidate_every_language() {
        let h = harness().await;
        let faq = h.service.create_faq(draft("Q1", "A1"), h.admin_id).await.unwrap();
        h.service.get_faqs(Some("en")).await.unwrap();
        h.service.get_faqs(Some("hi")).await.unwrap();
        h.service.get_faqs(Some("fr")).await.unwrap();
        assert_eq!(h.cache.len().await, 3);

        h.service.create_faq(draft("Q2", "A2"), h.admin_id).await.unwrap();
        assert!(h.cache.is_empty().await, "create must drop all languages");

        h.service.get_faqs(Some("hi")).await.unwrap();
        h.service
            .update_faq(faq.id, draft("Q1 v2", "A1 v2"))
            .await
            .unwrap();
        assert!(h.cache.is_empty().await, "update must drop all languages");

        h.service.get_faqs(Some("fr")).await.unwrap();
        h.service.delete_faq(faq.id).await.unwrap();
        assert!(h.cache.is_empty().await, "delete must drop all languages");
    }

    #[tokio::test]
    async fn update_regenerates_translations_from_new_text() {
        let h = harness().await;
        let faq = h.service.create_faq(draft("Old?", "Old."), h.admin_id).await.unwrap();
        let before = h.service.get_faqs(Some("hi")).await.unwrap();
        assert_eq!(before[0].faq.question, "[hi] Old?");

        let updated = h
            .service
            .update_faq(faq.id, draft("New?", "New."))
            .await
            .unwrap();
        assert_eq!(updated.lang, "en");
        assert_eq!(updated.original_id, None);

        let after = h.service.get_faqs(Some("hi")).await.unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].faq.question, "[hi] New?");
        assert_eq!(after[0].faq.original_id, Some(faq.id));
    }

    #[tokio::test]
    async fn delete_removes_translations() {
        let h = harness().await;
        let faq = h.service.create_faq(draft("Q", "A"), h.admin_id).await.unwrap();
        h.service.get_faqs(Some("hi")).await.unwrap();

        h.service.delete_faq(faq.id).await.unwrap();

        assert!(h.service.get_faqs(Some("hi")).await.unwrap().is_empty());
        assert_eq!(h.store.faq_count().await, 0);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let h = harness().await;
        assert_matches!(
            h.service.update_faq(999_999, draft("Q", "A")).await,
            Err(ServiceError::Core(CoreError::NotFound { id: 999_999, .. }))
        );
        assert_matches!(
            h.service.delete_faq(999_999).await,
            Err(ServiceError::Core(CoreError::NotFound { id: 999_999, .. }))
        );
    }

    #[tokio::test]
    async fn translations_cannot_be_modified_directly() {
        let h = harness().await;
        h.service.create_faq(draft("Q", "A"), h.admin_id).await.unwrap();
        let hindi = h.service.get_faqs(Some("hi")).await.unwrap();
        let translation_id = hindi[0].faq.id;

        assert_matches!(
            h.service.update_faq(translation_id, draft("x", "y")).await,
            Err(ServiceError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            h.service.delete_faq(translation_id).await,
            Err(ServiceError::Core(CoreError::Validation(_)))
        );
    }

    #[tokio::test]
    async fn invalid_language_is_rejected_before_any_io() {
        let h = harness().await;
        assert_matches!(
            h.service.get_faqs(Some("not a lang")).await,
            Err(ServiceError::Core(CoreError::Validation(_)))
        );
        assert_eq!(h.translator.calls(), 0);
    }

    #[tokio::test]
    async fn correct_without_any_caching() {
        let store = Arc::new(MemoryStore::new());
        let translator = Arc::new(ScriptedTranslator::new());
        let admin_id = seed_admin(&store).await;
        let service = FaqService::new(store.clone(), Arc::new(NoopCache), translator.clone());

        service.create_faq(draft("Q", "A"), admin_id).await.unwrap();
        let first = service.get_faqs(Some("hi")).await.unwrap();
        let second = service.get_faqs(Some("hi")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(translator.calls(), 2, "existing translations are not redone");
        assert_eq!(store.faq_count().await, 2);
    }

    #[tokio::test]
    async fn concurrent_first_reads_do_not_duplicate_translations() {
        let h = harness_with(ScriptedTranslator::with_delay(Duration::from_millis(20))).await;
        for i in 0..3 {
            h.service
                .create_faq(draft(&format!("Q{i}"), &format!("A{i}")), h.admin_id)
                .await
                .unwrap();
        }

        let (a, b) = tokio::join!(h.service.get_faqs(Some("hi")), h.service.get_faqs(Some("hi")));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert_eq!(h.translator.calls(), 6, "only the leader translates");
        assert_eq!(h.store.faq_count().await, 6);
    }

    #[tokio::test]
    async fn independent_services_sharing_a_store_stay_unique() {
        // Two processes: separate single-flight tables, no shared cache. The
        // store's (original_id, lang) uniqueness is the last line of defence.
        let store = Arc::new(MemoryStore::new());
        let translator = Arc::new(ScriptedTranslator::with_delay(Duration::from_millis(20)));
        let admin_id = seed_admin(&store).await;
        let one = FaqService::new(store.clone(), Arc::new(NoopCache), translator.clone());
        let two = FaqService::new(store.clone(), Arc::new(NoopCache), translator.clone());
        let faq = one.create_faq(draft("Q", "A"), admin_id).await.unwrap();

        let (a, b) = tokio::join!(one.get_faqs(Some("hi")), two.get_faqs(Some("hi")));
        assert_eq!(a.unwrap().len(), 1);
        assert_eq!(b.unwrap().len(), 1);

        let hindi = store.list_faqs_by_language("hi").await.unwrap();
        assert_eq!(hindi.len(), 1);
        assert_eq!(hindi[0].faq.original_id, Some(faq.id));
    }

    #[tokio::test(start_paused = true)]
    async fn update_during_translation_discards_old_text() {
        let h = harness_with(ScriptedTranslator::with_delay(Duration::from_millis(50))).await;
        let faq = h.service.create_faq(draft("Old?", "Old."), h.admin_id).await.unwrap();

        let (read, updated) = tokio::join!(h.service.get_faqs(Some("hi")), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            h.service.update_faq(faq.id, draft("New?", "New.")).await
        });
        updated.unwrap();
        assert!(read.unwrap().is_empty(), "translation of the replaced text is dropped");
        assert!(h.store.list_faqs_by_language("hi").await.unwrap().is_empty());

        let hindi = h.service.get_faqs(Some("hi")).await.unwrap();
        assert_eq!(hindi.len(), 1);
        assert_eq!(hindi[0].faq.question, "[hi] New?");
        assert_eq!(hindi[0].faq.answer, "[hi] New.");
    }

    #[tokio::test(start_paused = true)]
    async fn create_during_read_is_not_hidden_by_cache() {
        let h = harness_with(ScriptedTranslator::with_delay(Duration::from_millis(50))).await;
        h.service.create_faq(draft("Q1", "A1"), h.admin_id).await.unwrap();

        let (read, created) = tokio::join!(h.service.get_faqs(Some("hi")), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            h.service.create_faq(draft("Q2", "A2"), h.admin_id).await
        });
        created.unwrap();
        assert_eq!(read.unwrap().len(), 1);
        assert!(h.cache.is_empty().await, "listing read before the create is not cached");

        let hindi = h.service.get_faqs(Some("hi")).await.unwrap();
        assert_eq!(hindi.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn write_on_another_instance_discards_in_flight_listing() {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new());
        let translator = Arc::new(ScriptedTranslator::with_delay(Duration::from_millis(50)));
        let admin_id = seed_admin(&store).await;
        let reader = FaqService::new(store.clone(), cache.clone(), translator.clone());
        let writer = FaqService::new(store.clone(), cache.clone(), translator.clone());
        writer.create_faq(draft("Q1", "A1"), admin_id).await.unwrap();

        let (read, created) = tokio::join!(reader.get_faqs(Some("hi")), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            writer.create_faq(draft("Q2", "A2"), admin_id).await
        });
        read.unwrap();
        created.unwrap();

        assert_eq!(reader.get_faqs(Some("hi")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_update_changes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let admin_id = seed_admin(&store).await;
        let service = FaqService::new(
            Arc::new(UpdateFailingStore(store.clone())),
            Arc::new(MemoryCache::new()),
            Arc::new(ScriptedTranslator::new()),
        );
        let faq = service.create_faq(draft("Old?", "Old."), admin_id).await.unwrap();
        let before = service.get_faqs(Some("hi")).await.unwrap();

        assert_matches!(
            service.update_faq(faq.id, draft("New?", "New.")).await,
            Err(ServiceError::Store(_))
        );

        let stored = store.find_faq(faq.id).await.unwrap().unwrap();
        assert_eq!(stored.question, "Old?");
        assert_eq!(store.faq_count().await, 2, "translation kept with the unchanged text");
        assert_eq!(service.get_faqs(Some("hi")).await.unwrap(), before);
    }
}
