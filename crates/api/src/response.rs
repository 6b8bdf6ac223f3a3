//! Response envelopes.
//!
//! Every body carries `success` and `message`; payloads sit beside them
//! under a resource-specific key (`faqs`, `faq`, `token`, `user`). Errors use
//! the same shape plus a `code`, see [`AppError`](crate::error::AppError).

use polyfaq_db::models::faq::{Faq, FaqWithAdmin};
use polyfaq_db::models::user::UserResponse;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FaqListResponse {
    pub success: bool,
    pub message: String,
    pub faqs: Vec<FaqWithAdmin>,
}

#[derive(Debug, Serialize)]
pub struct FaqResponse {
    pub success: bool,
    pub message: String,
    pub faq: Faq,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}
