use axum::{extract::rejection::JsonRejection, Extension, Json};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::settings::{KpiSettings, DEFAULT_COMMISSION_MULTIPLIER};
use crate::state::AppState;

/// Body of POST /api/config. `active_units` is required, the multiplier is not.
#[derive(Debug, Deserialize)]
pub struct ConfigUpdate {
    #[serde(alias = "unidades_ativas")]
    pub active_units: i64,
    #[serde(alias = "gonzaga_commission_multiplier", default = "default_multiplier")]
    pub commission_multiplier: f64,
}

fn default_multiplier() -> f64 {
    DEFAULT_COMMISSION_MULTIPLIER
}

/// GET /api/config - Current KPI settings
pub async fn config_get(Extension(state): Extension<AppState>) -> ApiResult<KpiSettings> {
    Ok(ApiResponse::success(state.settings.read().await))
}

/// POST /api/config - Replace the KPI settings document
pub async fn config_post(
    Extension(state): Extension<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<ConfigUpdate>, JsonRejection>,
) -> ApiResult<KpiSettings> {
    let Json(update) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let settings = KpiSettings {
        active_units: update.active_units,
        commission_multiplier: update.commission_multiplier,
    };

    let _guard = state.write_lock.lock().await;
    state.settings.write(&settings).await?;
    tracing::info!("Settings changed by '{}'", user.email);
    Ok(ApiResponse::success(settings))
}
