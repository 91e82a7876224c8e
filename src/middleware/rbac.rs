use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use thiserror::Error;

use crate::auth::Identity;
use crate::error::ApiError;
use crate::types::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("Authentication required.")]
    AuthenticationRequired,

    #[error("Insufficient permissions.")]
    InsufficientPermissions,
}

/// Allow-list of roles for a group of routes
#[derive(Debug, Clone)]
pub struct AllowedRoles(Arc<[Role]>);

impl AllowedRoles {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self(roles.into_iter().collect())
    }

    pub fn admin_only() -> Self {
        Self::new([Role::Admin])
    }

    pub fn roles(&self) -> &[Role] {
        &self.0
    }
}

pub fn check_role(allowed: &[Role], identity: Option<&Identity>) -> Result<(), GuardError> {
    let identity = identity.ok_or(GuardError::AuthenticationRequired)?;

    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        Err(GuardError::InsufficientPermissions)
    }
}

/// Role guard. Must be layered inside [`jwt_auth_middleware`](super::jwt_auth_middleware);
/// it only reads the identity the verifier left behind.
pub async fn require_role(
    State(allowed): State<AllowedRoles>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = request.extensions().get::<Identity>();

    if let Err(e) = check_role(allowed.roles(), identity) {
        tracing::warn!(
            user_id = identity.map(|i| i.user_id),
            role = identity.map(|i| i.role.as_str()),
            path = %request.uri().path(),
            "Access denied: {}",
            e
        );
        return Err(e.into());
    }

    Ok(next.run(request).await)
}
