pub mod catalog;
pub mod credentials;
pub mod models;
pub mod products;

pub use catalog::{CatalogError, CatalogSource, HttpCatalog, StaticCatalog};
pub use credentials::CredentialStore;
pub use products::ProductRepository;

use thiserror::Error;

/// Errors from the in-memory stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Product with ID {0} not found")]
    NotFound(u64),

    #[error("Failed to initialize product repository with initial data: {0}")]
    Seed(#[from] CatalogError),

    #[error("Duplicate product ID {0} in initial data")]
    DuplicateId(u64),

    #[error("No product IDs left to assign")]
    IdSpaceExhausted,
}
