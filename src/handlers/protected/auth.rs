use axum::Extension;

use crate::database::UserResponse;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

/// GET /api/auth/whoami - Account behind the bearer token
pub async fn whoami(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResult<UserResponse> {
    Ok(ApiResponse::success(UserResponse::from(user)))
}
