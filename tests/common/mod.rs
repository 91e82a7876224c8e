#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{http::StatusCode as AxumStatus, routing::get, Json, Router};
use reqwest::StatusCode;
use serde_json::{json, Value};
use url::Url;

use catalog_api::app::{router, AppState};
use catalog_api::config::AppConfig;
use catalog_api::store::{CredentialStore, HttpCatalog, ProductRepository};

pub const JWT_SECRET: &str = "integration-test-secret";

/// Rows served by the fake catalog. The ids have a gap on purpose so the
/// next assigned id is 21.
pub fn fixture_products() -> Value {
    json!([
        {
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "Fits 15 inch laptops",
            "category": "men's clothing",
            "image": "https://img.example/1.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        },
        {
            "id": 2,
            "title": "Slim Fit T-Shirt",
            "price": 22.3,
            "description": "Slim-fitting style",
            "category": "men's clothing",
            "image": "https://img.example/2.jpg",
            "rating": { "rate": 4.1, "count": 259 }
        },
        {
            "id": 20,
            "title": "Cotton Jacket",
            "price": 12.99,
            "description": "Lightweight",
            "category": "women's clothing",
            "image": "https://img.example/20.jpg",
            "rating": { "rate": 3.6, "count": 145 }
        }
    ])
}

pub fn complete_product() -> Value {
    json!({
        "title": "Test Product",
        "price": 9.99,
        "description": "A test product",
        "category": "test",
        "image": "test.jpg"
    })
}

/// Stand-in for the external catalog endpoint
pub enum FakeCatalog {
    Products(Value),
    Status(u16),
}

impl FakeCatalog {
    /// Serve on a free port and return the products URL.
    pub async fn serve(self) -> Result<Url> {
        let app = match self {
            FakeCatalog::Products(body) => {
                Router::new().route("/products", get(move || async move { Json(body) }))
            }
            FakeCatalog::Status(code) => {
                let status = AxumStatus::from_u16(code)?;
                Router::new().route("/products", get(move || async move { status }))
            }
        };

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Url::parse(&format!("http://127.0.0.1:{}/products", port))?)
    }
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Fresh server seeded from the fixture catalog.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(FakeCatalog::Products(fixture_products())).await
    }

    pub async fn spawn_with(catalog: FakeCatalog) -> Result<Self> {
        let mut config = AppConfig::with_secret(JWT_SECRET);
        config.catalog.url = catalog.serve().await?;
        config.catalog.timeout_secs = 5;
        config.api.enable_request_logging = false;

        let repository = ProductRepository::new();
        repository
            .seed_from(&HttpCatalog::from_config(&config.catalog))
            .await
            .context("seeding from fake catalog")?;

        Self::start(config, repository).await
    }

    /// Server built from an explicit config and repository (no seeding).
    pub async fn start(mut config: AppConfig, repository: ProductRepository) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;

        let users = CredentialStore::seeded()?;
        let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
        let app = router(AppState::new(config, Arc::new(users), Arc::new(repository)));

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self {
            port,
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/api/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

        let body: Value = res.json().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub async fn admin_token(&self) -> Result<String> {
        self.login("admin", "password123").await
    }

    pub async fn user_token(&self) -> Result<String> {
        self.login("user", "password456").await
    }
}

/// Status plus parsed body (`Value::Null` for an empty body)
pub async fn read(res: reqwest::Response) -> Result<(StatusCode, Value)> {
    let status = res.status();
    let bytes = res.bytes().await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}
