//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Largest accepted request body; snapshots carry every execution of a period.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new().route("/task-analysis", post(handlers::analyze_tasks));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = create_router(AppState::default())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/task-analysis")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_empty_snapshot() {
        let (status, body) = send(post_json("{}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["included"], serde_json::json!([]));
        assert_eq!(body["histogram"]["binSize"], 5.0);
        assert_eq!(body["strategy"]["mode"], "panel");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (status, body) = send(post_json("{\"executions\": [")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_BODY");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_bad_params_are_bad_request() {
        let (status, body) = send(post_json(r#"{"params": {"show_regression": "yes"}}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_non_numeric_multiplier_is_reported() {
        let (status, body) = send(post_json(r#"{"params": {"min_multiplier": "abc"}}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["validation_errors"],
            serde_json::json!(["Band multiplier 'abc' is not a number"])
        );
        assert_eq!(body["included"], serde_json::json!([]));
    }
}
