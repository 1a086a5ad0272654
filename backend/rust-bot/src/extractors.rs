use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::metrics::UPDATES_RECEIVED_TOTAL;

/// JSON body extractor for webhook payloads. Ignores the content type and
/// answers empty or unparsable bodies with a JSON 400.
pub struct WebhookJson<T>(pub T);

impl<T, S> FromRequest<S> for WebhookJson<T>
where
    T: serde::de::DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if body.is_empty() {
            return Err(reject("Received an empty update".to_string()));
        }

        serde_json::from_slice::<T>(&body)
            .map(WebhookJson)
            .map_err(|e| reject(format!("Failed to parse update: {}", e)))
    }
}

fn reject(message: String) -> Response {
    tracing::error!("{}", message);
    UPDATES_RECEIVED_TOTAL
        .with_label_values(&["rejected"])
        .inc();
    let error_response = json!({
        "message": message,
        "status": 400
    });
    (StatusCode::BAD_REQUEST, Json(error_response)).into_response()
}
