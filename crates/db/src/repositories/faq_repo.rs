//! Repository for the `faqs` table.

use polyfaq_core::language::CANONICAL_LANGUAGE;
use polyfaq_core::types::DbId;
use sqlx::PgPool;

use crate::models::faq::{
    CreateFaq, CreateTranslation, Faq, FaqWithAdmin, FaqWithAdminRow, UpdateFaq,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, question, answer, lang, created_by, original_id, created_at, updated_at";

/// Same columns qualified for the `faqs f JOIN users u` listing query.
const JOINED_COLUMNS: &str = "f.id, f.question, f.answer, f.lang, f.created_by, f.original_id, \
                              f.created_at, f.updated_at, u.email AS admin_email";

/// Provides CRUD operations for FAQs.
pub struct FaqRepo;

impl FaqRepo {
    /// Insert a canonical FAQ, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateFaq) -> Result<Faq, sqlx::Error> {
        let query = format!(
            "INSERT INTO faqs (question, answer, lang, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Faq>(&query)
            .bind(&input.question)
            .bind(&input.answer)
            .bind(CANONICAL_LANGUAGE)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Insert a translation unless one already exists for
    /// `(original_id, lang)`.
    ///
    /// The canonical row is locked `FOR SHARE` and must still carry
    /// `source_updated_at`, so a translation of text that an update has since
    /// replaced is never stored. Returns `None` when a concurrent writer got
    /// there first or the canonical row changed or vanished.
    pub async fn create_translation(
        pool: &PgPool,
        input: &CreateTranslation,
    ) -> Result<Option<Faq>, sqlx::Error> {
        let query = format!(
            "WITH source AS (
                SELECT id FROM faqs
                WHERE id = $5 AND updated_at = $6
                FOR SHARE
             )
             INSERT INTO faqs (question, answer, lang, created_by, original_id)
             SELECT $1, $2, $3, $4, id FROM source
             ON CONFLICT (original_id, lang) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Faq>(&query)
            .bind(&input.question)
            .bind(&input.answer)
            .bind(&input.lang)
            .bind(input.created_by)
            .bind(input.original_id)
            .bind(input.source_updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Find an FAQ by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Faq>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM faqs WHERE id = $1");
        sqlx::query_as::<_, Faq>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every FAQ in `lang` with its creator's email, oldest first.
    pub async fn list_by_language(
        pool: &PgPool,
        lang: &str,
    ) -> Result<Vec<FaqWithAdmin>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM faqs f
             JOIN users u ON u.id = f.created_by
             WHERE f.lang = $1
             ORDER BY f.id"
        );
        let rows = sqlx::query_as::<_, FaqWithAdminRow>(&query)
            .bind(lang)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(FaqWithAdmin::from).collect())
    }

    /// List FAQs in `lang` created by any of `creators`.
    pub async fn list_by_language_and_creators(
        pool: &PgPool,
        lang: &str,
        creators: &[DbId],
    ) -> Result<Vec<Faq>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM faqs
             WHERE lang = $1 AND created_by = ANY($2)
             ORDER BY id"
        );
        sqlx::query_as::<_, Faq>(&query)
            .bind(lang)
            .bind(creators)
            .fetch_all(pool)
            .await
    }

    /// Replace an FAQ's question and answer and drop its translations, in one
    /// transaction. Returns the updated row and how many translations went.
    ///
    /// `updated_at` strictly increases, since pending translations are keyed
    /// on it.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFaq,
    ) -> Result<Option<(Faq, u64)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE faqs SET
                question = $2,
                answer = $3,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(faq) = sqlx::query_as::<_, Faq>(&query)
            .bind(id)
            .bind(&input.question)
            .bind(&input.answer)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let stale = sqlx::query("DELETE FROM faqs WHERE original_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(Some((faq, stale)))
    }

    /// Delete an FAQ. Its translations go with it (`ON DELETE CASCADE`).
    ///
    /// Returns `true` if the row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM faqs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
