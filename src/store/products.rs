use std::collections::HashSet;

use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::store::catalog::CatalogSource;
use crate::store::models::{NewProduct, Product, ProductPatch};
use crate::store::StoreError;

#[derive(Debug)]
struct ProductTable {
    products: Vec<Product>,
    next_id: u64,
}

impl ProductTable {
    fn empty() -> Self {
        Self {
            products: Vec::new(),
            next_id: 1,
        }
    }

    /// Ids must be unique and leave room for at least one more.
    fn new(products: Vec<Product>) -> Result<Self, StoreError> {
        let mut seen = HashSet::with_capacity(products.len());
        if let Some(dup) = products.iter().find(|p| !seen.insert(p.id)) {
            return Err(StoreError::DuplicateId(dup.id));
        }

        let next_id = match products.iter().map(|p| p.id).max() {
            Some(max) => max.checked_add(1).ok_or(StoreError::IdSpaceExhausted)?,
            None => 1,
        };
        Ok(Self { products, next_id })
    }

    fn position(&self, id: u64) -> Result<usize, StoreError> {
        self.products
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

/// In-memory product collection keyed by integer id, kept in insertion order.
///
/// Ids come from a monotonic counter that is bumped under the write lock and
/// never rewinds, so deleted ids are not handed out again.
#[derive(Debug)]
pub struct ProductRepository {
    table: RwLock<ProductTable>,
}

impl Default for ProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(ProductTable::empty()),
        }
    }

    /// Fails on duplicate ids or an id of `u64::MAX`.
    pub fn with_products(products: Vec<Product>) -> Result<Self, StoreError> {
        Ok(Self {
            table: RwLock::new(ProductTable::new(products)?),
        })
    }

    /// Replace the table with rows from `source`.
    ///
    /// On failure the table is left empty (next id 1) and the error is
    /// returned; callers decide whether that is fatal.
    pub async fn seed_from(&self, source: &dyn CatalogSource) -> Result<usize, StoreError> {
        info!("Loading initial products from {}", source.describe());

        let fetched = source.fetch_products().await;
        let mut table = self.table.write().await;

        match fetched.map_err(StoreError::Seed).and_then(ProductTable::new) {
            Ok(loaded) => {
                *table = loaded;
                info!(
                    "Product repository initialized with {} products. Next ID: {}",
                    table.products.len(),
                    table.next_id
                );
                Ok(table.products.len())
            }
            Err(e) => {
                *table = ProductTable::empty();
                error!("Failed to initialize product repository: {}", e);
                Err(e)
            }
        }
    }

    pub async fn list(&self) -> Vec<Product> {
        self.table.read().await.products.clone()
    }

    pub async fn get_by_id(&self, id: u64) -> Result<Product, StoreError> {
        let table = self.table.read().await;
        let index = table.position(id)?;
        Ok(table.products[index].clone())
    }

    pub async fn create(&self, data: NewProduct) -> Result<Product, StoreError> {
        let mut table = self.table.write().await;

        let id = table.next_id;
        table.next_id = id.checked_add(1).ok_or(StoreError::IdSpaceExhausted)?;

        let product = data.into_product(id);
        table.products.push(product.clone());

        debug!(
            "Added product {}. New count: {}, Next ID: {}",
            id,
            table.products.len(),
            table.next_id
        );
        Ok(product)
    }

    pub async fn update(&self, id: u64, patch: ProductPatch) -> Result<Product, StoreError> {
        let mut table = self.table.write().await;
        let index = table.position(id)?;

        let product = &mut table.products[index];
        patch.apply_to(product);

        debug!("Updated product with ID: {}", id);
        Ok(product.clone())
    }

    pub async fn delete(&self, id: u64) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        let index = table.position(id)?;

        table.products.remove(index);
        debug!("Deleted product with ID: {}", id);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.products.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
