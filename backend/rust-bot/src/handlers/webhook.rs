use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;

use crate::{
    extractors::WebhookJson, metrics::UPDATES_RECEIVED_TOTAL, models::Update, services::AppState,
};

/// Accepts a Telegram update and hands it to the dispatcher queue.
pub async fn receive_update(
    State(state): State<Arc<AppState>>,
    WebhookJson(update): WebhookJson<Update>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::debug!("Received update {}", update.update_id);

    match state.updates.try_send(update) {
        Ok(()) => {
            UPDATES_RECEIVED_TOTAL
                .with_label_values(&["accepted"])
                .inc();
            Ok((StatusCode::OK, "OK"))
        }
        Err(TrySendError::Full(update)) => {
            tracing::warn!("Update queue is full, dropping update {}", update.update_id);
            UPDATES_RECEIVED_TOTAL.with_label_values(&["dropped"]).inc();
            Err((StatusCode::SERVICE_UNAVAILABLE, "Update queue is full".to_string()))
        }
        Err(TrySendError::Closed(update)) => {
            tracing::error!("Dispatcher is not running, dropping update {}", update.update_id);
            UPDATES_RECEIVED_TOTAL.with_label_values(&["dropped"]).inc();
            Err((StatusCode::SERVICE_UNAVAILABLE, "Dispatcher is not running".to_string()))
        }
    }
}
