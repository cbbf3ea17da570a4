//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::dto::{HealthResponse, TaskAnalysisBody, TaskAnalysisData};
use super::error::AppError;
use super::state::AppState;
use crate::services::task_analysis;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check() -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

// =============================================================================
// Task Analysis
// =============================================================================

/// POST /v1/task-analysis
///
/// Analyze a snapshot of executions against the panel catalog. Parameters the
/// client omits take the server's configured defaults.
pub async fn analyze_tasks(
    State(state): State<AppState>,
    body: Result<Json<TaskAnalysisBody>, JsonRejection>,
) -> HandlerResult<TaskAnalysisData> {
    let Json(body) = body?;
    let request = body
        .into_request(&state.config.default_params())
        .map_err(|e| AppError::BadRequest(format!("Invalid analysis parameters: {}", e)))?;

    tracing::debug!(
        executions = request.executions.len(),
        panels = request.panels.len(),
        "Running task analysis"
    );

    // CPU-bound; keep it off the async workers.
    let data = tokio::task::spawn_blocking(move || task_analysis::analyze(&request))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    Ok(Json(data))
}
