pub mod memory;
pub mod product;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{config::Config, error::AppError};

/// A free-form JSON object stored in the products collection.
pub type Document = Map<String, Value>;

/// Document store abstraction for the products collection.
#[async_trait]
pub trait Database: Send + Sync {
    /// Point lookup on the document's `id` field.
    async fn get_product(&self, id: &str) -> Result<Option<Document>, AppError>;

    /// Appends a document. No read-back, no duplicate check.
    async fn insert_product(&self, document: Document) -> Result<(), AppError>;
}

/// DynamoDB-backed storage for production use.
#[derive(Clone)]
pub struct DynamoDb {
    pub(crate) client: aws_sdk_dynamodb::Client,
    pub products_table: String,
}

#[async_trait]
impl Database for DynamoDb {
    async fn get_product(&self, id: &str) -> Result<Option<Document>, AppError> {
        DynamoDb::get_product(self, id).await
    }

    async fn insert_product(&self, document: Document) -> Result<(), AppError> {
        DynamoDb::insert_product(self, document).await
    }
}

#[async_trait]
impl Database for memory::MemoryDb {
    async fn get_product(&self, id: &str) -> Result<Option<Document>, AppError> {
        memory::MemoryDb::get_product(self, id).await
    }

    async fn insert_product(&self, document: Document) -> Result<(), AppError> {
        memory::MemoryDb::insert_product(self, document).await
    }
}

/// Create a DynamoDB-backed database. Credentials come from the standard AWS
/// environment chain.
pub async fn dynamo(config: &Config) -> Arc<dyn Database> {
    let sdk_config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&sdk_config);
    Arc::new(DynamoDb {
        client,
        products_table: config.products_table.clone(),
    })
}

/// Create an in-memory database for local development and testing.
pub fn memory() -> Arc<dyn Database> {
    Arc::new(memory::MemoryDb::new())
}

/// String form of a document's `id`, accepting string and numeric ids.
pub fn document_id(document: &Document) -> Option<String> {
    match document.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
