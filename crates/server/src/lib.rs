// crates/server/src/lib.rs
//! Field intelligence server library.
//!
//! This crate provides the Axum-based HTTP server for the field intelligence
//! dashboard. It serves read-only report endpoints over a SQLite star schema
//! and, optionally, the dashboard's static bundle.

pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;

pub use config::{Cli, ServerConfig};
pub use error::*;
pub use metrics::{init_metrics, record_request, render_metrics};
pub use routes::api_routes;
pub use state::AppState;

use std::path::PathBuf;

use axum::{http::Uri, Router};
use fieldintel_db::Database;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Fallback for non-API paths when no dashboard bundle is configured.
async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - API routes, `/test` and `/metrics`
/// - SPA serving from `static_dir` with `index.html` fallback, if given
/// - CORS (allows any origin)
/// - Request tracing
pub fn create_app(db: Database, static_dir: Option<PathBuf>) -> Router {
    let state = AppState::new(db);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api_routes(state);
    let app = match static_dir {
        Some(dir) => {
            let index = dir.join("index.html");
            app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => app.fallback(not_found),
    };

    app.layer(cors).layer(TraceLayer::new_for_http())
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use fieldintel_db::fixtures::{self, ConversationSeed};
    use fieldintel_db::SchemaVariant;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    /// Helper to make a GET request to the app.
    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = get(app, uri).await;
        let json = serde_json::from_str(&body).unwrap_or_else(|e| panic!("{e}: {body}"));
        (status, json)
    }

    /// Store seeded with three conversations today, two converted.
    async fn seeded(variant: SchemaVariant) -> Database {
        let db = Database::new_in_memory(variant).await.unwrap();
        fixtures::seed_dimensions(&db).await.unwrap();
        fixtures::seed_dates(&db, 30).await.unwrap();
        for (converted, sentiment, region) in [(true, 0.5, 1), (true, 1.0, 1), (false, -0.5, 2)] {
            let seed = ConversationSeed {
                region_id: Some(region),
                channel_id: Some(1),
                team_id: Some(1),
                agent_id: Some(1),
                converted,
                sentiment: Some(sentiment),
                confidence: Some(0.8),
                status: Some("Booked".to_string()),
                ..ConversationSeed::default()
            };
            fixtures::insert_conversation(&db, &seed).await.unwrap();
        }
        db
    }

    // ========================================================================
    // Health Endpoint Tests
    // ========================================================================

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_app(seeded(SchemaVariant::Outcome).await, None);
        let (status, json) = get_json(app, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["conversations"], 3);
    }

    #[tokio::test]
    async fn test_health_reports_store_failure() {
        let db = Database::new_in_memory(SchemaVariant::Outcome).await.unwrap();
        sqlx::raw_sql("DROP TABLE fact_conversation")
            .execute(db.pool())
            .await
            .unwrap();
        let app = create_app(db, None);
        let (status, json) = get_json(app, "/api/health").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["status"], "error");
        assert!(json["error"].as_str().unwrap().contains("fact_conversation"));
    }

    #[tokio::test]
    async fn test_smoke_endpoint() {
        let db = Database::new_in_memory(SchemaVariant::Outcome).await.unwrap();
        let (status, json) = get_json(create_app(db, None), "/test").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert!(json["timestamp"].is_string());
    }

    // ========================================================================
    // Report Endpoint Tests
    // ========================================================================

    #[tokio::test]
    async fn test_tiles_endpoint() {
        for variant in [SchemaVariant::Outcome, SchemaVariant::Severity] {
            let app = create_app(seeded(variant).await, None);
            let (status, json) = get_json(app, "/api/mission-brief/tiles?time_range=7").await;

            assert_eq!(status, StatusCode::OK);
            let tiles = json["tiles"].as_array().unwrap();
            assert_eq!(tiles.len(), 5);
            assert_eq!(tiles[0]["id"], "conversations");
            assert_eq!(tiles[0]["value"], 3);
            assert_eq!(tiles[0]["type"], "number");
            assert_eq!(tiles[1]["value"], 2);
            assert_eq!(tiles[2]["value"], "66.7%");
            assert_eq!(tiles[2]["type"], "percent");
            assert_eq!(tiles[3]["value"], "0.33");
            assert_eq!(tiles[4]["value"], "20.0");
        }
    }

    #[tokio::test]
    async fn test_filters_apply_from_query_string() {
        let app = create_app(seeded(SchemaVariant::Severity).await, None);
        let (_, json) = get_json(app.clone(), "/api/mission-brief/tiles?region_id=2").await;
        assert_eq!(json["tiles"][0]["value"], 1);

        // Garbage values are dropped rather than rejected.
        let (status, json) =
            get_json(app, "/api/mission-brief/tiles?region_id=abc&time_range=xyz&team_id=-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["tiles"][0]["value"], 3);
    }

    #[tokio::test]
    async fn test_repeated_query_key_keeps_first_value() {
        let app = create_app(seeded(SchemaVariant::Outcome).await, None);

        let (status, json) =
            get_json(app.clone(), "/api/mission-brief/tiles?region_id=2&region_id=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["tiles"][0]["value"], 1);

        let (status, json) =
            get_json(app, "/api/field-signal/pulse?time_range=3&time_range=30&region_id=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_every_report_endpoint_returns_data_envelope() {
        let app = create_app(seeded(SchemaVariant::Outcome).await, None);
        for path in [
            "/api/field-signal/pulse",
            "/api/field-signal/issues",
            "/api/field-signal/severity-distribution",
            "/api/field-signal/hotspots",
            "/api/field-ops/agents",
            "/api/field-ops/teams",
            "/api/field-strategy/outcomes",
            "/api/field-strategy/risk-by-region",
            "/api/field-strategy/outcome-trend",
        ] {
            let (status, json) = get_json(app.clone(), path).await;
            assert_eq!(status, StatusCode::OK, "{path}");
            assert!(json["data"].is_array(), "{path}: {json}");
        }
    }

    #[tokio::test]
    async fn test_dimensions_and_data_quality() {
        let app = create_app(seeded(SchemaVariant::Outcome).await, None);

        let (status, json) = get_json(app.clone(), "/api/filters/dimensions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["regions"].as_array().unwrap().len(), 5);
        // Outcome layout: teams are the channel list under team field names.
        let names = |list: &serde_json::Value, key: &str| -> Vec<String> {
            list.as_array()
                .unwrap()
                .iter()
                .map(|v| v[key].as_str().unwrap().to_string())
                .collect()
        };
        assert_eq!(names(&json["teams"], "team_name"), names(&json["channels"], "channel_name"));
        assert!(json["client_types"].as_array().unwrap().is_empty());
        assert_eq!(json["time_ranges"][0]["value"], "7");

        let (status, json) = get_json(app, "/api/field-hq/data-quality").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_conversations"], 3);
        assert_eq!(json["entity_mentions"], 0);
        assert_eq!(json["sentiment_coverage_pct"], 100.0);
    }

    #[tokio::test]
    async fn test_store_error_returns_500_json() {
        let db = Database::new_in_memory(SchemaVariant::Severity).await.unwrap();
        sqlx::raw_sql("DROP TABLE dim_region").execute(db.pool()).await.unwrap();
        let app = create_app(db, None);

        let (status, json) = get_json(app, "/api/field-signal/hotspots").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Database error");
        assert!(json["details"].is_string());
    }

    // ========================================================================
    // CORS Tests
    // ========================================================================

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let db = Database::new_in_memory(SchemaVariant::Outcome).await.unwrap();
        let app = create_app(db, None);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("Origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let allow_origin = response.headers().get("access-control-allow-origin");
        assert_eq!(allow_origin.unwrap(), "*");
    }

    // ========================================================================
    // 404 and SPA Tests
    // ========================================================================

    #[tokio::test]
    async fn test_404_for_unknown_api_route() {
        let db = Database::new_in_memory(SchemaVariant::Outcome).await.unwrap();
        let (status, json) = get_json(create_app(db, None), "/api/nonexistent").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Endpoint not found");
    }

    #[tokio::test]
    async fn test_404_without_static_dir() {
        let db = Database::new_in_memory(SchemaVariant::Outcome).await.unwrap();
        let (status, json) = get_json(create_app(db, None), "/dashboard").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Endpoint not found");
    }

    #[tokio::test]
    async fn test_spa_fallback_serves_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>dashboard</html>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();

        let db = Database::new_in_memory(SchemaVariant::Outcome).await.unwrap();
        let app = create_app(db, Some(dir.path().to_path_buf()));

        let (status, body) = get(app.clone(), "/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "console.log(1)");

        let (status, body) = get(app.clone(), "/field-signal/deep/link").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("dashboard"));

        // API misses stay JSON even with a bundle configured.
        let (status, _) = get(app, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
