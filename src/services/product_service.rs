use std::sync::Arc;

use tracing::info;

use crate::store::models::{NewProduct, Product, ProductPatch};
use crate::store::{ProductRepository, StoreError};

/// Product operations exposed to the HTTP layer. Input has already been
/// validated by the time it gets here.
#[derive(Debug, Clone)]
pub struct ProductService {
    repository: Arc<ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_all(&self) -> Vec<Product> {
        self.repository.list().await
    }

    pub async fn get_by_id(&self, id: u64) -> Result<Product, StoreError> {
        self.repository.get_by_id(id).await
    }

    pub async fn create(&self, data: NewProduct) -> Result<Product, StoreError> {
        let product = self.repository.create(data).await?;
        info!("Product created: {} ({})", product.id, product.title);
        Ok(product)
    }

    pub async fn update(&self, id: u64, patch: ProductPatch) -> Result<Product, StoreError> {
        let product = self.repository.update(id, patch).await?;
        info!("Product updated: {}", id);
        Ok(product)
    }

    pub async fn delete(&self, id: u64) -> Result<(), StoreError> {
        self.repository.delete(id).await?;
        info!("Product deleted: {}", id);
        Ok(())
    }

    pub async fn count(&self) -> usize {
        self.repository.len().await
    }
}
