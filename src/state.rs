use std::sync::Arc;

use crate::{
    config::{Config, DatabaseBackend},
    db::{self, Database},
    event_grid::{EventGridClient, EventPublisher},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub publisher: Arc<dyn EventPublisher>,
}

impl AppState {
    pub async fn new(config: &Config) -> Self {
        let db = match config.database_backend {
            DatabaseBackend::Memory => {
                tracing::info!("Using in-memory database backend");
                db::memory()
            }
            DatabaseBackend::Dynamo => {
                tracing::info!(
                    table = %config.products_table,
                    "Using DynamoDB database backend"
                );
                db::dynamo(config).await
            }
        };

        tracing::info!(endpoint = %config.event_grid.endpoint, "Publishing orders to Event Grid");
        let publisher: Arc<dyn EventPublisher> =
            Arc::new(EventGridClient::new(config.event_grid.clone()));

        Self { db, publisher }
    }
}
