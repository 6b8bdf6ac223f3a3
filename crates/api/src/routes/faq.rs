use axum::routing::{get, put};
use axum::Router;

use crate::handlers::faq;
use crate::state::AppState;

/// FAQ routes mounted at `/faqs`.
///
/// ```text
/// GET    /        -> list_faqs (?lang=xx)
/// POST   /        -> create_faq (admin only)
/// PUT    /{id}    -> update_faq (admin only)
/// DELETE /{id}    -> delete_faq (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(faq::list_faqs).post(faq::create_faq))
        .route("/{id}", put(faq::update_faq).delete(faq::delete_faq))
}
