use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;

use crate::{error::AppError, event_grid::EventGridEvent, state::AppState};

use super::is_blank;

const ORDER_SUBJECT: &str = "BFYOC/stores/serverlessWorkshop/orders";
const ORDER_EVENT_TYPE: &str = "BFYOC.IceCream.Order";
const ORDER_DATA_VERSION: &str = "2.0";

/// Publishes the order as a single envelope and echoes it back once the
/// topic has accepted it.
pub async fn handler(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, AppError> {
    tracing::info!("New ice cream order made.");

    if is_blank(&body) {
        return Err(AppError::BadRequest(
            "Please pass an ice cream order in the request body".to_string(),
        ));
    }

    let order: Value = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("Request body is not valid JSON".to_string()))?;

    let event = EventGridEvent::new(
        ORDER_SUBJECT,
        ORDER_EVENT_TYPE,
        ORDER_DATA_VERSION,
        order.clone(),
    );
    state.publisher.publish(std::slice::from_ref(&event)).await?;

    tracing::info!(event_id = %event.id, "Ice cream order published");

    Ok(Json(order))
}
