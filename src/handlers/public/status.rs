use axum::{http::StatusCode, response::IntoResponse, Extension};
use serde_json::json;

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - Service description
pub async fn root() -> ApiResult<serde_json::Value> {
    Ok(ApiResponse::success(json!({
        "name": "Rental KPI API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Booking KPIs for a short-term rental portfolio",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "public_auth": "/auth/login, /auth/register (public - token acquisition)",
            "auth": "/api/auth/whoami (protected)",
            "kpis": "/api/kpis, /api/channels (protected)",
            "admin": "/api/config, /api/upload, /api/dataset, /api/users (admin)",
        }
    })))
}

/// GET /health - Database liveness
pub async fn health(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(()) => ApiResponse::with_status(
            json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            }),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            ApiError::service_unavailable("Database unavailable").into_response()
        }
    }
}
