// crates/server/src/routes/field_ops.rs
//! Field ops: agent and team performance.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use fieldintel_core::{AgentPerformance, DataResponse, TeamPerformance};

use super::{normalize, QueryPairs};
use crate::error::ApiResult;
use crate::metrics::RequestTimer;
use crate::state::AppState;

/// GET /api/field-ops/agents
pub async fn agents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> ApiResult<Json<DataResponse<AgentPerformance>>> {
    let filters = normalize(&state, query);
    let timer = RequestTimer::new("agents");
    let result = state.db.agent_performance(&filters).await;
    timer.finish(&result);
    Ok(Json(result?.into()))
}

/// GET /api/field-ops/teams
pub async fn teams(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> ApiResult<Json<DataResponse<TeamPerformance>>> {
    let filters = normalize(&state, query);
    let timer = RequestTimer::new("teams");
    let result = state.db.team_performance(&filters).await;
    timer.finish(&result);
    Ok(Json(result?.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/field-ops/agents", get(agents))
        .route("/field-ops/teams", get(teams))
}
