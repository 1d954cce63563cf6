mod add_products;
mod featured_product;
mod health;
mod ice_cream_order;
mod products;
mod storage_event_processor;

use axum::{
    extract::{rejection::QueryRejection, Query},
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::handler))
        .route(
            "/api/products/featured",
            get(featured_product::handler).post(featured_product::handler),
        )
        .route(
            "/api/products",
            get(products::handler).post(products::handler),
        )
        .route("/api/addproducts", post(add_products::handler))
        .route("/api/icecreamorder", post(ice_cream_order::handler))
        .route(
            "/api/storageeventprocessor",
            post(storage_event_processor::handler),
        )
        .with_state(state)
}

#[derive(Deserialize)]
pub struct IdQuery {
    id: Option<String>,
}

/// The `id` query parameter, if present and non-empty. An unparsable query
/// string counts as no id.
pub(crate) fn requested_id(query: Result<Query<IdQuery>, QueryRejection>) -> Option<String> {
    query
        .ok()
        .and_then(|Query(query)| query.id)
        .filter(|id| !id.is_empty())
}

pub(crate) fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(b""));
        assert!(is_blank(b" \r\n\t"));
        assert!(!is_blank(b"{}"));
    }

    #[test]
    fn test_requested_id() {
        let present = Ok(Query(IdQuery {
            id: Some("1".to_string()),
        }));
        assert_eq!(requested_id(present), Some("1".to_string()));

        let empty = Ok(Query(IdQuery {
            id: Some(String::new()),
        }));
        assert_eq!(requested_id(empty), None);

        let absent = Ok(Query(IdQuery { id: None }));
        assert_eq!(requested_id(absent), None);
    }
}
