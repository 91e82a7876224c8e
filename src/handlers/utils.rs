// handlers/utils.rs - Request parsing shared across tiers

use axum::{extract::rejection::JsonRejection, Json};
use serde_json::Value;

use crate::error::ApiError;

/// Product ids are non-negative integers; anything else in the path is a 400.
pub fn parse_product_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>()
        .map_err(|_| ApiError::bad_request("Invalid product ID format"))
}

/// Unwrap a JSON body, turning axum's plain-text rejection into the JSON error shape.
pub fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    let Json(value) = body?;
    Ok(value)
}
