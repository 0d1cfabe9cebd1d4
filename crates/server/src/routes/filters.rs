// crates/server/src/routes/filters.rs
//! Filter dropdown options.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use fieldintel_core::FilterDimensions;

use crate::error::ApiResult;
use crate::metrics::RequestTimer;
use crate::state::AppState;

/// GET /api/filters/dimensions - Every dimension list plus time ranges.
pub async fn dimensions(State(state): State<Arc<AppState>>) -> ApiResult<Json<FilterDimensions>> {
    let timer = RequestTimer::new("dimensions");
    let result = state.db.filter_dimensions().await;
    timer.finish(&result);
    Ok(Json(result?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/filters/dimensions", get(dimensions))
}
