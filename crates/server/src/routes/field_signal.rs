// crates/server/src/routes/field_signal.rs
//! Field signal: pulse, issues, severity mix, hotspots.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use fieldintel_core::{DataResponse, Hotspot, IssueSummary, PulsePoint, SeverityCount};

use super::{normalize, QueryPairs};
use crate::error::ApiResult;
use crate::metrics::RequestTimer;
use crate::state::AppState;

/// GET /api/field-signal/pulse - Daily volume and sentiment.
pub async fn pulse(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> ApiResult<Json<DataResponse<PulsePoint>>> {
    let filters = normalize(&state, query);
    let timer = RequestTimer::new("pulse");
    let result = state.db.daily_pulse(&filters).await;
    timer.finish(&result);
    Ok(Json(result?.into()))
}

/// GET /api/field-signal/issues - Top ten issue classifications.
pub async fn issues(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> ApiResult<Json<DataResponse<IssueSummary>>> {
    let filters = normalize(&state, query);
    let timer = RequestTimer::new("issues");
    let result = state.db.top_issues(&filters).await;
    timer.finish(&result);
    Ok(Json(result?.into()))
}

/// GET /api/field-signal/severity-distribution
pub async fn severity_distribution(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> ApiResult<Json<DataResponse<SeverityCount>>> {
    let filters = normalize(&state, query);
    let timer = RequestTimer::new("severity_distribution");
    let result = state.db.severity_distribution(&filters).await;
    timer.finish(&result);
    Ok(Json(result?.into()))
}

/// GET /api/field-signal/hotspots - Per-region volume and risk.
pub async fn hotspots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> ApiResult<Json<DataResponse<Hotspot>>> {
    let filters = normalize(&state, query);
    let timer = RequestTimer::new("hotspots");
    let result = state.db.hotspots(&filters).await;
    timer.finish(&result);
    Ok(Json(result?.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/field-signal/pulse", get(pulse))
        .route("/field-signal/issues", get(issues))
        .route("/field-signal/severity-distribution", get(severity_distribution))
        .route("/field-signal/hotspots", get(hotspots))
}
