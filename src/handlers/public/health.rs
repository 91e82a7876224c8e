// handlers/public/health.rs - Service metadata

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - service descriptor
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Catalog API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Product catalog backend with token authentication",
        "endpoints": {
            "health": "GET /api/health (public)",
            "auth": "POST /api/auth/login (public), GET /api/auth/me, POST /api/auth/logout (token)",
            "products": "GET /api/products[/:id] (public)",
            "admin": "POST /api/products, PUT|DELETE /api/products/:id (ADMIN token)",
        }
    }))
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "API is running",
        "timestamp": Utc::now().to_rfc3339(),
        "products": state.products.count().await,
    }))
}
