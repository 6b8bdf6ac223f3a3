//! Handlers for the `/auth` resource (signup, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use polyfaq_core::error::CoreError;
use polyfaq_core::roles::resolve_signup_role;
use polyfaq_db::models::user::{CreateUser, UserResponse};
use polyfaq_db::store::StoreError;
use serde::Deserialize;
use validator::ValidateEmail;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::response::{LoginResponse, SignupResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
///
/// Fields are optional so that a missing field is reported as a validation
/// error naming it, rather than as a JSON rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Only `"admin"` is honoured; anything else signs up a regular user.
    pub role: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register an account. Returns 201 with the public user record.
pub async fn signup(
    State(state): State<AppState>,
    AppJson(input): AppJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    let full_name = present(input.full_name.as_deref());
    let email = present(input.email.as_deref()).map(str::to_lowercase);
    let password = input.password.as_deref().filter(|p| !p.is_empty());

    let (Some(full_name), Some(email_addr), Some(password)) =
        (full_name, email.as_deref(), password)
    else {
        let mut missing = Vec::new();
        if full_name.is_none() {
            missing.push("fullName");
        }
        if email.is_none() {
            missing.push("email");
        }
        if password.is_none() {
            missing.push("password");
        }
        return Err(CoreError::missing_fields(&missing).into());
    };

    if !email_addr.validate_email() {
        return Err(CoreError::Validation("Invalid email address".into()).into());
    }

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        full_name: full_name.to_string(),
        email: email_addr.to_string(),
        password_hash,
        role: resolve_signup_role(input.role.as_deref()).to_string(),
    };

    let user = match state.users.create_user(&create).await {
        Ok(user) => user,
        Err(StoreError::Conflict(_)) => {
            return Err(CoreError::Conflict("Email already used".into()).into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, role = %user.role, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            success: true,
            message: "User created successfully".into(),
            user: UserResponse::from(&user),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns a bearer token valid for
/// `JWT_EXPIRY_HOURS`.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = present(input.email.as_deref()).map(str::to_lowercase);
    let password = input.password.as_deref().filter(|p| !p.is_empty());
    let (Some(email_addr), Some(password)) = (email.as_deref(), password) else {
        let mut missing = Vec::new();
        if email.is_none() {
            missing.push("email");
        }
        if password.is_none() {
            missing.push("password");
        }
        return Err(CoreError::missing_fields(&missing).into());
    };

    // Unknown email and wrong password are indistinguishable to the caller.
    let user = state
        .users
        .find_user_by_email(email_addr)
        .await?
        .ok_or(CoreError::InvalidCredentials)?;

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(CoreError::InvalidCredentials.into());
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".into(),
        token,
        user: UserResponse::from(&user),
    }))
}

/// Trimmed, non-empty value.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
