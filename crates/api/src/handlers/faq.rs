//! Handlers for the `/faqs` resource.
//!
//! Reads are public. Writes require an admin bearer token; the admin's id is
//! recorded as the creator of new FAQs.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use polyfaq_core::types::DbId;
use polyfaq_service::FaqDraft;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{FaqListResponse, FaqResponse, MessageResponse};
use crate::state::AppState;

/// Query parameters for `GET /faqs`.
#[derive(Debug, Default, Deserialize)]
pub struct FaqListParams {
    /// Target language; canonical when absent or blank.
    pub lang: Option<String>,
}

/// Body for create and update.
#[derive(Debug, Default, Deserialize)]
pub struct FaqInput {
    pub question: Option<String>,
    pub answer: Option<String>,
}

impl FaqInput {
    fn into_draft(self) -> AppResult<FaqDraft> {
        Ok(FaqDraft::new(
            self.question.as_deref(),
            self.answer.as_deref(),
        )?)
    }
}

/// GET /api/v1/faqs?lang=xx
pub async fn list_faqs(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<FaqListParams>,
) -> AppResult<Json<FaqListResponse>> {
    let faqs = state.faqs.get_faqs(params.lang.as_deref()).await?;
    Ok(Json(FaqListResponse {
        success: true,
        message: "FAQs fetched successfully".into(),
        faqs,
    }))
}

/// POST /api/v1/faqs
pub async fn create_faq(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<FaqInput>,
) -> AppResult<(StatusCode, Json<FaqResponse>)> {
    let draft = input.into_draft()?;
    let faq = state.faqs.create_faq(draft, admin.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(FaqResponse {
            success: true,
            message: "FAQ created successfully".into(),
            faq,
        }),
    ))
}

/// PUT /api/v1/faqs/{id}
pub async fn update_faq(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<FaqInput>,
) -> AppResult<Json<FaqResponse>> {
    let draft = input.into_draft()?;
    let faq = state.faqs.update_faq(id, draft).await?;
    Ok(Json(FaqResponse {
        success: true,
        message: "FAQ updated successfully".into(),
        faq,
    }))
}

/// DELETE /api/v1/faqs/{id}
pub async fn delete_faq(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    state.faqs.delete_faq(id).await?;
    Ok(Json(MessageResponse::ok("FAQ deleted successfully")))
}
