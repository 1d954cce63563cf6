use std::sync::{Arc, RwLock};

use crate::error::AppError;

use super::{document_id, Document};

/// In-memory database backend for local development and testing.
/// Uses `Arc<RwLock<...>>` so it can be `Clone`d across axum handlers.
#[derive(Clone, Default)]
pub struct MemoryDb {
    products: Arc<RwLock<Vec<Document>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_product(&self, id: &str) -> Result<Option<Document>, AppError> {
        let products = self
            .products
            .read()
            .map_err(|e| AppError::Internal(format!("Lock error: {e}")))?;

        // Later appends shadow earlier ones with the same id.
        Ok(products
            .iter()
            .rev()
            .find(|doc| document_id(doc).as_deref() == Some(id))
            .cloned())
    }

    pub async fn insert_product(&self, document: Document) -> Result<(), AppError> {
        let mut products = self
            .products
            .write()
            .map_err(|e| AppError::Internal(format!("Lock error: {e}")))?;
        products.push(document);

        Ok(())
    }

    /// Every stored document in append order.
    pub fn products(&self) -> Result<Vec<Document>, AppError> {
        let products = self
            .products
            .read()
            .map_err(|e| AppError::Internal(format!("Lock error: {e}")))?;
        Ok(products.clone())
    }
}
