use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::metrics;
use crate::services::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let answers = state.answer_key.len();
    let dispatcher_running = !state.updates.is_closed();

    let (status_code, status) = if !dispatcher_running {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    } else if answers == 0 {
        (StatusCode::OK, "degraded")
    } else {
        (StatusCode::OK, "healthy")
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "service": "testcheck-bot",
            "version": env!("CARGO_PKG_VERSION"),
            "answer_key_length": answers,
            "dispatcher": if dispatcher_running { "running" } else { "stopped" },
            "known_users": state.sessions.len().await,
        })),
    )
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

pub mod webhook;
