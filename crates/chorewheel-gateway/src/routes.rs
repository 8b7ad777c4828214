//! API route handlers for the gateway.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;

use super::server::AppState;

/// Health check endpoint.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "chorewheel-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// List all chores with their assignment and urgency flags.
pub async fn list_chores(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.list_chores(Utc::now()) {
        Ok(chores) => (StatusCode::OK, Json(serde_json::json!({ "chores": chores }))),
        Err(e) => {
            tracing::warn!("⚠️ Failed to list chores: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Internal server error" })),
            )
        }
    }
}

/// Complete a chore: hand it to the other participant and reschedule.
pub async fn complete_chore(
    State(state): State<Arc<AppState>>,
    Path(chore_id): Path<i64>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.complete_chore(chore_id, Utc::now()) {
        Ok(Some(result)) => (
            StatusCode::OK,
            Json(serde_json::json!({ "completed": result })),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Chore not found" })),
        ),
        Err(e) => {
            tracing::warn!("⚠️ Failed to complete chore {chore_id}: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Internal server error" })),
            )
        }
    }
}
