// crates/server/src/routes/mission_brief.rs
//! Mission brief KPI tiles.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use fieldintel_core::TilesResponse;

use super::{normalize, QueryPairs};
use crate::error::ApiResult;
use crate::metrics::RequestTimer;
use crate::state::AppState;

/// GET /api/mission-brief/tiles - Headline numbers for the filtered window.
pub async fn tiles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryPairs>,
) -> ApiResult<Json<TilesResponse>> {
    let filters = normalize(&state, query);
    let timer = RequestTimer::new("tiles");
    let result = state.db.mission_brief_tiles(&filters).await;
    timer.finish(&result);
    Ok(Json(result?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/mission-brief/tiles", get(tiles))
}
