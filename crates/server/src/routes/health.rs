// crates/server/src/routes/health.rs
//! Liveness endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::metrics::RequestTimer;
use crate::state::AppState;

/// Response for the health check endpoint.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthResponse {
    Healthy {
        conversations: i64,
        schema: String,
        uptime_secs: u64,
    },
    Error {
        error: String,
    },
}

/// GET /api/health - Store reachability check.
///
/// Returns the total conversation count, or 500 with the store error.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let timer = RequestTimer::new("health");
    let result = state.db.conversation_count().await;
    timer.finish(&result);

    match result {
        Ok(conversations) => (
            StatusCode::OK,
            Json(HealthResponse::Healthy {
                conversations,
                schema: state.db.variant().to_string(),
                uptime_secs: state.uptime_secs(),
            }),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse::Error {
                error: e.to_string(),
            }),
        ),
    }
}

/// Response for the store-free smoke test.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct SmokeResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

/// GET /test - Confirms the process is serving without touching the store.
pub async fn smoke_test() -> Json<SmokeResponse> {
    Json(SmokeResponse {
        status: "success".to_string(),
        message: "Backend is working!".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Create the health routes router (nested under `/api`).
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

/// Root-level smoke test route.
pub fn smoke_router() -> Router<Arc<AppState>> {
    Router::new().route("/test", get(smoke_test))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse::Healthy {
            conversations: 42,
            schema: "outcome".to_string(),
            uptime_secs: 3,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["conversations"], 42);

        let json = serde_json::to_value(HealthResponse::Error {
            error: "no such table".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "no such table");
    }
}
