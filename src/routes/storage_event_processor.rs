use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    db::Document,
    error::AppError,
    event_grid::{EventKind, InboundEvent, SubscriptionValidationResponse},
    state::AppState,
};

/// Receives a batch of envelopes pushed by Event Grid.
///
/// Envelopes are handled in array order. The first subscription validation
/// payload answers the handshake and ends the request; nothing after it is
/// looked at. Otherwise every `.json` blob-created event has its `data`
/// appended to the products collection.
///
/// The body only has to be a JSON array of objects. Each envelope is judged
/// on its own `subject`, `eventType` and `data`.
pub async fn handler(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let envelopes: Vec<Document> = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "rejecting malformed event batch");
        AppError::BadRequest("Request body is not a valid event batch".to_string())
    })?;

    let mut stored = 0usize;
    for envelope in &envelopes {
        let event = InboundEvent::from_object(envelope);
        match event.kind() {
            EventKind::SubscriptionValidation { validation_code } => {
                tracing::info!(
                    event_id = event.id.unwrap_or("-"),
                    "Answering subscription validation"
                );
                let response = SubscriptionValidationResponse {
                    validation_response: validation_code,
                };
                return Ok(Json(response).into_response());
            }
            EventKind::JsonBlobCreated(document) => {
                state.db.insert_product(document.clone()).await?;
                stored += 1;
            }
            EventKind::Ignored => {}
        }
    }

    tracing::info!(received = envelopes.len(), stored, "Processed storage events");

    Ok(StatusCode::OK.into_response())
}
