use axum::{
    extract::{rejection::QueryRejection, Query},
    Json,
};
use serde::Serialize;

use crate::error::AppError;

use super::{requested_id, IdQuery};

const FEATURED_PRODUCT_ID: &str = "1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub flavor: String,
    pub price_per_scoop: f64,
}

fn featured_product() -> Product {
    Product {
        id: FEATURED_PRODUCT_ID.to_string(),
        flavor: "Rainbow Road".to_string(),
        price_per_scoop: 3.99,
    }
}

/// Serves the one hardcoded product, without touching the store.
pub async fn handler(
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Product>, AppError> {
    match requested_id(query) {
        Some(id) if id == FEATURED_PRODUCT_ID => Ok(Json(featured_product())),
        _ => Err(AppError::BadRequest(
            "Please pass in an id query parameter".to_string(),
        )),
    }
}
