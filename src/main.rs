use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use catalog_api::app::{router, AppState};
use catalog_api::config::AppConfig;
use catalog_api::store::{CredentialStore, HttpCatalog, ProductRepository};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up JWT_SECRET, CATALOG_API_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("catalog_api=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    tracing::info!("Starting Catalog API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_none() {
        anyhow::bail!("FATAL ERROR: JWT_SECRET is not defined; refusing to start");
    }

    let users = CredentialStore::seeded().context("failed to hash seed user passwords")?;

    let repository = ProductRepository::new();
    repository
        .seed_from(&HttpCatalog::from_config(&config.catalog))
        .await
        .context("product catalog could not be loaded")?;

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, Arc::new(users), Arc::new(repository));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Catalog API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
