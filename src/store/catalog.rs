//! External product catalog used to seed the product repository at startup.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::config::CatalogConfig;
use crate::store::models::Product;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("catalog at {url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("catalog at {url} returned malformed product data: {reason}")]
    Decode { url: String, reason: String },
}

/// Anything that can hand back the initial product rows.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Human-readable origin for log lines.
    fn describe(&self) -> String;
}

/// Fetches the catalog as a JSON array over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl HttpCatalog {
    pub fn new(url: Url, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            timeout,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.url.clone(), Duration::from_secs(config.timeout_secs))
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let url = self.url.to_string();

        let response = self
            .client
            .get(self.url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CatalogError::Request {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json::<Vec<Product>>()
            .await
            .map_err(|e| CatalogError::Decode {
                url,
                reason: e.to_string(),
            })
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Fixed in-memory rows.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }

    fn describe(&self) -> String {
        format!("static catalog ({} rows)", self.products.len())
    }
}
