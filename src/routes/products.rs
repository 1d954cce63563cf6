use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::{db::Document, error::AppError, state::AppState};

use super::{requested_id, IdQuery};

const INVALID_ID_MESSAGE: &str = "Please pass in a valid id query parameter";

pub async fn handler(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Document>, AppError> {
    let id = requested_id(query).ok_or_else(|| AppError::BadRequest(INVALID_ID_MESSAGE.into()))?;

    let product = state
        .db
        .get_product(&id)
        .await?
        .ok_or_else(|| AppError::BadRequest(INVALID_ID_MESSAGE.into()))?;

    Ok(Json(product))
}
