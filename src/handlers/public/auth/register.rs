// handlers/public/auth/register.rs - POST /auth/register handler

use axum::{extract::rejection::JsonRejection, Extension, Json};

use super::{issue_token, CredentialsRequest, TokenResponse};
use crate::auth::{hash_password, ROLE_USER};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /auth/register - Create a `user` account and log it in
pub async fn register_post(
    Extension(state): Extension<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let Json(request) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let email = request.email.trim();

    if email.is_empty() {
        return Err(ApiError::field_error("email", "Email is required"));
    }
    if request.password.is_empty() {
        return Err(ApiError::field_error("password", "Password is required"));
    }

    let hashed = hash_password(request.password, state.config.security.bcrypt_cost).await?;
    let user = state
        .users()
        .create(email, &hashed, ROLE_USER)
        .await?
        .ok_or_else(|| ApiError::conflict("Email already registered"))?;

    tracing::info!("Registered account '{}'", user.email);
    Ok(ApiResponse::created(issue_token(&state, &user)?))
}
