// handlers/public/auth/login.rs - POST /auth/login handler

use axum::{extract::rejection::JsonRejection, Extension, Json};

use super::{issue_token, CredentialsRequest, TokenResponse};
use crate::auth::verify_password;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /auth/login - Exchange email and password for a bearer token
///
/// Unknown email and wrong password give the same 401.
pub async fn login_post(
    Extension(state): Extension<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let Json(request) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let email = request.email.trim();

    let Some(user) = state.users().find_by_email(email).await? else {
        tracing::warn!("Login failed: unknown account '{}'", email);
        return Err(invalid_credentials());
    };

    if !verify_password(request.password, user.hashed_password.clone()).await? {
        tracing::warn!("Login failed: wrong password for '{}'", email);
        return Err(invalid_credentials());
    }

    tracing::info!("User '{}' logged in", user.email);
    Ok(ApiResponse::success(issue_token(&state, &user)?))
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Incorrect email or password")
}
