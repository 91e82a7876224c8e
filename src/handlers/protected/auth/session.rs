// handlers/protected/auth/session.rs - POST /api/auth/logout

use axum::http::StatusCode;

use crate::auth::Identity;

/// Tokens are stateless, so there is nothing to revoke; the client drops its copy.
pub async fn logout_post(identity: Identity) -> StatusCode {
    tracing::info!("User {} logged out", identity.user_id);
    StatusCode::NO_CONTENT
}
