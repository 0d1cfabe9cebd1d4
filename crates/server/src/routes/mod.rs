// crates/server/src/routes/mod.rs
//! API route handlers for the field intelligence server.

pub mod field_hq;
pub mod field_ops;
pub mod field_signal;
pub mod field_strategy;
pub mod filters;
pub mod health;
pub mod metrics;
pub mod mission_brief;

use std::sync::Arc;

use axum::{http::Uri, Router};
use fieldintel_core::{FilterQuery, FilterSet};

use crate::error::ApiError;
use crate::state::AppState;

/// Decoded query-string pairs, in arrival order. A repeated key keeps its
/// first value.
pub type QueryPairs = Vec<(String, String)>;

/// Normalize raw query parameters against the store's schema layout.
pub(crate) fn normalize(state: &AppState, pairs: QueryPairs) -> FilterSet {
    FilterSet::normalize(&FilterQuery::from_pairs(pairs), state.db.schema())
}

/// Fallback for unmatched `/api/*` paths.
async fn api_not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET /api/health - Store reachability and conversation count
/// - GET /api/filters/dimensions - Filter dropdown contents
/// - GET /api/mission-brief/tiles - KPI tiles
/// - GET /api/field-signal/{pulse,issues,severity-distribution,hotspots}
/// - GET /api/field-ops/{agents,teams}
/// - GET /api/field-strategy/{outcomes,risk-by-region,outcome-trend}
/// - GET /api/field-hq/data-quality - Whole-store coverage
/// - GET /test - Smoke test, no store access
/// - GET /metrics - Prometheus text exposition
pub fn api_routes(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(filters::router())
        .merge(mission_brief::router())
        .merge(field_signal::router())
        .merge(field_ops::router())
        .merge(field_strategy::router())
        .merge(field_hq::router())
        .fallback(api_not_found);

    Router::new()
        .nest("/api", api)
        .merge(health::smoke_router())
        .merge(metrics::router())
        .with_state(state)
}
