// handlers/protected/auth/me.rs - GET /api/auth/me

use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::AppState;
use crate::auth::{AuthError, Identity};
use crate::error::ApiError;
use crate::store::models::UserProfile;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

/// Profile of the caller named by the verified token.
pub async fn me_get(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<MeResponse>, ApiError> {
    match state.auth.get_profile(identity.user_id) {
        Ok(user) => Ok(Json(MeResponse { user })),
        // A valid token for a user that no longer resolves is an auth failure here
        Err(AuthError::UserNotFound) => Err(ApiError::unauthorized("User not found")),
        Err(e) => Err(e.into()),
    }
}
