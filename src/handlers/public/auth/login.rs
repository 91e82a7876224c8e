// handlers/public/auth/login.rs - POST /api/auth/login

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::utils::json_body;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Exchange `{ "username", "password" }` for a signed access token.
///
/// Both fields must be non-empty strings. An unknown username is a 404 and a
/// wrong password a 401.
pub async fn login_post(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let body = json_body(body)?;

    let field = |name: &str| {
        body.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let (Some(username), Some(password)) = (field("username"), field("password")) else {
        return Err(ApiError::bad_request("Username and password are required"));
    };

    // Password verification is CPU bound; keep it off the async workers
    let auth = state.auth.clone();
    let token = tokio::task::spawn_blocking(move || auth.authenticate(&username, &password))
        .await
        .map_err(ApiError::internal)??;

    Ok(Json(LoginResponse { token }))
}
