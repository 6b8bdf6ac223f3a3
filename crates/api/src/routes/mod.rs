pub mod auth;
pub mod faq;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup                 register (public)
/// /auth/login                  login (public)
///
/// /faqs                        list (public), create (admin)
/// /faqs/{id}                   update, delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/faqs", faq::router())
}
