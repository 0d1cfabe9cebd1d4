// crates/server/src/routes/field_hq.rs
//! Field HQ data-quality snapshot.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use fieldintel_core::DataQuality;

use crate::error::ApiResult;
use crate::metrics::RequestTimer;
use crate::state::AppState;

/// GET /api/field-hq/data-quality - Whole-store coverage, unfiltered.
pub async fn data_quality(State(state): State<Arc<AppState>>) -> ApiResult<Json<DataQuality>> {
    let timer = RequestTimer::new("data_quality");
    let result = state.db.data_quality().await;
    timer.finish(&result);
    Ok(Json(result?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/field-hq/data-quality", get(data_quality))
}
