use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::rbac::GuardError;
use crate::auth::{Identity, TokenError, TokenSigner};
use crate::error::ApiError;

/// Access token verifier. On success the caller's [`Identity`](crate::auth::Identity)
/// is inserted into the request extensions for downstream handlers and guards.
pub async fn jwt_auth_middleware(
    State(signer): State<TokenSigner>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?;
    let identity = signer.verify(token)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// Anything short of a `Bearer` scheme followed by a second segment counts as
/// no token at all.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(TokenError::MissingToken)?;

    let mut segments = value.split_whitespace();
    match (segments.next(), segments.next()) {
        (Some("Bearer"), Some(token)) => Ok(token),
        _ => Err(TokenError::MissingToken),
    }
}

/// Handlers behind the verifier take `Identity` as an argument. Reaching one
/// without the verifier having run is an authentication failure, not a 500.
#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .ok_or_else(|| GuardError::AuthenticationRequired.into())
    }
}
