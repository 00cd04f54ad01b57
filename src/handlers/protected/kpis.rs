use axum::{
    extract::{rejection::QueryRejection, Query},
    Extension,
};
use chrono::Local;
use serde::Deserialize;

use crate::error::ApiError;
use crate::kpi::{self, KpiQuery, KpiSnapshot};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct KpiParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(alias = "state_filter")]
    pub region: Option<String>,
    #[serde(alias = "channel_filter")]
    pub channel: Option<String>,
}

/// GET /api/kpis - KPI snapshot for a date range with optional region/channel filters
///
/// Dates are `YYYY-MM-DD`; omitted dates cover the 30 days ending today.
pub async fn kpis_get(
    Extension(state): Extension<AppState>,
    params: Result<Query<KpiParams>, QueryRejection>,
) -> ApiResult<KpiSnapshot> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let query = KpiQuery::parse(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        params.region,
        params.channel,
        Local::now().date_naive(),
    )?;

    // One snapshot of each backing resource for the whole request
    let dataset = state.datasets.snapshot().await?;
    let settings = state.settings.read().await;

    let snapshot = kpi::compute(&dataset, &query, &settings);
    tracing::debug!(
        "KPIs {}..{} region={:?} channel={:?}: {} bookings",
        query.start, query.end, query.region, query.channel, snapshot.total_reservations
    );
    Ok(ApiResponse::success(snapshot))
}

/// GET /api/channels - Distinct booking channels in first-seen order
pub async fn channels_get(Extension(state): Extension<AppState>) -> ApiResult<Vec<String>> {
    let dataset = state.datasets.snapshot().await?;
    Ok(ApiResponse::success(dataset.channels()))
}
