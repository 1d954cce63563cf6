use axum::{body::Bytes, extract::State, http::StatusCode};
use serde_json::Value;

use crate::{error::AppError, state::AppState};

use super::is_blank;

pub async fn handler(State(state): State<AppState>, body: Bytes) -> Result<StatusCode, AppError> {
    if is_blank(&body) {
        return Err(AppError::BadRequest(
            "Please pass a product in the request body".to_string(),
        ));
    }

    let product = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(product)) => product,
        _ => {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ))
        }
    };

    state.db.insert_product(product).await?;

    Ok(StatusCode::OK)
}
