// handlers/elevated/products.rs - Product mutations

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::utils::{json_body, parse_product_id};
use crate::store::models::{Product, ProductDraft, ProductPatch};

/// POST /api/products - 201 with the stored product
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let data = ProductDraft::from_json(json_body(body)?)?.validate()?;
    let product = state.products.create(data).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/:id - partial merge; the id never changes
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_product_id(&id)?;
    let patch = ProductPatch::from_json(json_body(body)?)?;
    let product = state.products.update(id, patch).await?;
    Ok(Json(product))
}

/// DELETE /api/products/:id - 204 with no body
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_product_id(&id)?;
    state.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
