use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::database::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Account row backing the current request
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Middleware that resolves the JWT subject against the users table.
/// A token for a deleted account is rejected even if it has not expired.
pub async fn validate_user_middleware(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before user validation"))?;

    let user = state.users().find_by_email(&auth_user.email).await?.ok_or_else(|| {
        tracing::warn!("User validation failed: '{}' no longer exists", auth_user.email);
        ApiError::unauthorized("Could not validate credentials")
    })?;

    if user.role != auth_user.role {
        tracing::debug!(
            "Role for '{}' changed since token was issued ({} -> {})",
            user.email, auth_user.role, user.role
        );
    }

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
