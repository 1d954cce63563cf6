use aws_sdk_dynamodb::types::AttributeValue;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_item};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;

use super::{document_id, Document, DynamoDb};

impl DynamoDb {
    pub async fn get_product(&self, id: &str) -> Result<Option<Document>, AppError> {
        let response = self
            .client
            .get_item()
            .table_name(&self.products_table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("DynamoDB get product failed: {e}")))?;

        match response.item {
            Some(item) => {
                let document = from_item::<Document>(item).map_err(|e| {
                    AppError::Internal(format!("Failed to deserialize product: {e}"))
                })?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    pub async fn insert_product(&self, document: Document) -> Result<(), AppError> {
        let document = with_partition_key(document);

        let item = to_item(&document)
            .map_err(|e| AppError::Internal(format!("Failed to serialize product: {e}")))?;

        self.client
            .put_item()
            .table_name(&self.products_table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to insert product: {e}")))?;

        Ok(())
    }
}

/// The table is keyed on a string `id`. Numeric ids keep their value as a
/// string, documents without one get a generated id.
fn with_partition_key(mut document: Document) -> Document {
    let id = document_id(&document).unwrap_or_else(|| Uuid::new_v4().to_string());
    document.insert("id".to_string(), Value::String(id));
    document
}
