// crates/server/src/routes/field_strategy.rs
//! Field strategy: outcomes, regional risk, outcome trend.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use fieldintel_core::{DataResponse, OutcomeCount, OutcomeTrendPoint, RegionRisk};

use super::{normalize, QueryPairs};
use crate::error::ApiResult;
use crate::metrics::RequestTimer;
use crate::state::AppState;

/// GET /api/field-strategy/outcomes
pub async fn outcomes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> ApiResult<Json<DataResponse<OutcomeCount>>> {
    let filters = normalize(&state, query);
    let timer = RequestTimer::new("outcomes");
    let result = state.db.outcome_distribution(&filters).await;
    timer.finish(&result);
    Ok(Json(result?.into()))
}

/// GET /api/field-strategy/risk-by-region
pub async fn risk_by_region(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> ApiResult<Json<DataResponse<RegionRisk>>> {
    let filters = normalize(&state, query);
    let timer = RequestTimer::new("risk_by_region");
    let result = state.db.risk_by_region(&filters).await;
    timer.finish(&result);
    Ok(Json(result?.into()))
}

/// GET /api/field-strategy/outcome-trend - Only `time_range` applies.
pub async fn outcome_trend(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> ApiResult<Json<DataResponse<OutcomeTrendPoint>>> {
    let filters = normalize(&state, query).window_only();
    let timer = RequestTimer::new("outcome_trend");
    let result = state.db.outcome_trend(&filters).await;
    timer.finish(&result);
    Ok(Json(result?.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/field-strategy/outcomes", get(outcomes))
        .route("/field-strategy/risk-by-region", get(risk_by_region))
        .route("/field-strategy/outcome-trend", get(outcome_trend))
}
