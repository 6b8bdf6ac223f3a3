//! Domain error taxonomy.
//!
//! Every crate above `polyfaq-core` reduces its failures to one of these
//! variants before they reach the HTTP layer, which owns the status mapping.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Missing or malformed input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness rule was violated (e.g. email already registered).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Login with an unknown email or a wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, invalid or expired bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn faq_not_found(id: DbId) -> Self {
        CoreError::NotFound { entity: "FAQ", id }
    }

    /// Build a validation error from a list of missing field names.
    pub fn missing_fields(fields: &[&str]) -> Self {
        CoreError::Validation(format!("Missing required fields: {}", fields.join(", ")))
    }
}
