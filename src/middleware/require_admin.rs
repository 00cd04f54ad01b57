use axum::{extract::Request, middleware::Next, response::Response};

use super::validate_user::CurrentUser;
use crate::error::ApiError;

/// Gate for the elevated tier. Uses the stored role, not the role in the token.
pub async fn require_admin_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let CurrentUser(user) = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| ApiError::unauthorized("User validation required before admin check"))?;

    if !user.is_admin() {
        tracing::warn!("Admin access denied for '{}'", user.email);
        return Err(ApiError::forbidden("Administrator privileges required"));
    }

    Ok(next.run(request).await)
}
