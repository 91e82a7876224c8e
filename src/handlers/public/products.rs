// handlers/public/products.rs - Read-only product routes

use axum::{
    extract::{Path, State},
    Json,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::utils::parse_product_id;
use crate::store::models::Product;

/// GET /api/products - every product, in insertion order
pub async fn list(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.products.get_all().await)
}

/// GET /api/products/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_product_id(&id)?;
    let product = state.products.get_by_id(id).await?;
    Ok(Json(product))
}
