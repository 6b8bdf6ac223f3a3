//! Request handlers.
//!
//! Handlers extract and validate input, delegate to the store (auth) or the
//! [`FaqService`](polyfaq_service::FaqService) (FAQs), and map errors via
//! [`AppError`](crate::error::AppError).

pub mod auth;
pub mod faq;
