//! FAQ entity model and DTOs.

use polyfaq_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full row from the `faqs` table.
///
/// Serialized in camelCase because this is the shape clients (and the cache)
/// see.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: DbId,
    pub question: String,
    pub answer: String,
    pub lang: String,
    pub created_by: DbId,
    /// Canonical FAQ this row was translated from; `None` for canonical rows.
    pub original_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Faq {
    pub fn is_translation(&self) -> bool {
        self.original_id.is_some()
    }
}

/// Creator details embedded in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqAdmin {
    pub email: String,
}

/// An FAQ together with its creator's email, as returned by listings and
/// stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqWithAdmin {
    #[serde(flatten)]
    pub faq: Faq,
    pub admin: FaqAdmin,
}

/// Flat join row; converted into [`FaqWithAdmin`].
#[derive(Debug, FromRow)]
pub struct FaqWithAdminRow {
    pub id: DbId,
    pub question: String,
    pub answer: String,
    pub lang: String,
    pub created_by: DbId,
    pub original_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub admin_email: String,
}

impl From<FaqWithAdminRow> for FaqWithAdmin {
    fn from(row: FaqWithAdminRow) -> Self {
        FaqWithAdmin {
            faq: Faq {
                id: row.id,
                question: row.question,
                answer: row.answer,
                lang: row.lang,
                created_by: row.created_by,
                original_id: row.original_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            admin: FaqAdmin {
                email: row.admin_email,
            },
        }
    }
}

/// DTO for a new canonical FAQ. The language is always the canonical one.
#[derive(Debug, Clone)]
pub struct CreateFaq {
    pub question: String,
    pub answer: String,
    pub created_by: DbId,
}

/// DTO for a machine-translated copy of a canonical FAQ.
#[derive(Debug, Clone)]
pub struct CreateTranslation {
    pub question: String,
    pub answer: String,
    pub lang: String,
    pub created_by: DbId,
    pub original_id: DbId,
    /// `updated_at` of the canonical row the text was translated from. The
    /// insert is skipped if the canonical row has changed since.
    pub source_updated_at: Timestamp,
}

/// DTO for replacing an FAQ's text.
#[derive(Debug, Clone)]
pub struct UpdateFaq {
    pub question: String,
    pub answer: String,
}
