use axum::{
    extract::{rejection::JsonRejection, Path},
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::{hash_password, ROLE_ADMIN, ROLE_USER};
use crate::database::UserResponse;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PasswordUpdate {
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    #[serde(default)]
    pub role: String,
}

/// GET /api/users - All accounts
pub async fn users_list(Extension(state): Extension<AppState>) -> ApiResult<Vec<UserResponse>> {
    let users = state.users().list().await?;
    Ok(ApiResponse::success(users.into_iter().map(UserResponse::from).collect()))
}

/// DELETE /api/users/:id - Remove an account other than the caller's own
pub async fn user_delete(
    Path(id): Path<i64>,
    Extension(state): Extension<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
) -> ApiResult<serde_json::Value> {
    if caller.id == id {
        return Err(ApiError::bad_request("You cannot delete your own account"));
    }

    state.users().delete(id).await?;
    tracing::info!("User {} deleted by '{}'", id, caller.email);
    Ok(ApiResponse::success(serde_json::json!({ "id": id, "deleted": true })))
}

/// PUT /api/users/:id/password - Set a new password
pub async fn user_password_put(
    Path(id): Path<i64>,
    Extension(state): Extension<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    payload: Result<Json<PasswordUpdate>, JsonRejection>,
) -> ApiResult<UserResponse> {
    let Json(update) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    if update.new_password.is_empty() {
        return Err(ApiError::field_error("new_password", "Password cannot be empty"));
    }

    let users = state.users();
    let user = users.get(id).await?;
    let hashed = hash_password(update.new_password, state.config.security.bcrypt_cost).await?;
    users.update_password(id, &hashed).await?;

    tracing::info!("Password for user {} reset by '{}'", id, caller.email);
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// PUT /api/users/:id/role - Change an account's role
pub async fn user_role_put(
    Path(id): Path<i64>,
    Extension(state): Extension<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    payload: Result<Json<RoleUpdate>, JsonRejection>,
) -> ApiResult<UserResponse> {
    let Json(update) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let role = update.role.trim();
    if role.is_empty() {
        return Err(ApiError::field_error("role", "Role cannot be empty"));
    }
    if role != ROLE_ADMIN && role != ROLE_USER {
        return Err(ApiError::field_error(
            "role",
            format!("Unknown role '{}', expected '{}' or '{}'", role, ROLE_ADMIN, ROLE_USER),
        ));
    }

    let user = state.users().update_role(id, role).await?;
    tracing::info!("User {} role set to '{}' by '{}'", id, role, caller.email);
    Ok(ApiResponse::success(UserResponse::from(user)))
}
