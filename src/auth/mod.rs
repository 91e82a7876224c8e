pub mod password;
pub mod service;

pub use service::{AuthError, AuthService};

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::types::Role;

/// Signed access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: u64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: u64, role: Role, ttl_secs: i64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::seconds(ttl_secs)).timestamp();

        Self {
            user_id,
            role,
            iat: now.timestamp(),
            exp,
        }
    }
}

/// Verified caller identity, attached to the request once a token checks out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: u64,
    pub role: Role,
}

impl Identity {
    /// Check the claim shape of a payload whose signature and expiry already passed.
    ///
    /// `userId` only has to be a present non-negative integer, so a legitimate id of 0 is accepted.
    fn from_payload(payload: &Value) -> Result<Self, TokenError> {
        let user_id = payload
            .get("userId")
            .and_then(Value::as_u64)
            .ok_or(TokenError::InvalidPayload)?;

        let role = payload
            .get("role")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<Role>().ok())
            .ok_or(TokenError::InvalidPayload)?;

        Ok(Self { user_id, role })
    }
}

impl From<&Claims> for Identity {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id,
            role: claims.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("No token provided")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidOrExpired,

    #[error("Invalid token payload")]
    InvalidPayload,

    #[error("Authentication configuration error.")]
    MissingSecret,

    #[error("token generation failed: {0}")]
    Generation(String),
}

/// Issues and verifies HS256 access tokens with the shared secret.
///
/// A signer without a secret is valid to construct but refuses every
/// operation with [`TokenError::MissingSecret`].
#[derive(Clone)]
pub struct TokenSigner {
    secret: Option<Arc<str>>,
    ttl_secs: i64,
    validation: Arc<Validation>,
}

impl TokenSigner {
    pub fn new(secret: Option<String>, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            secret: secret.filter(|s| !s.is_empty()).map(Arc::from),
            ttl_secs,
            validation: Arc::new(validation),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    fn secret(&self) -> Result<&str, TokenError> {
        self.secret.as_deref().ok_or(TokenError::MissingSecret)
    }

    /// Sign a fresh token for the user, expiring after the configured lifetime.
    pub fn issue(&self, user_id: u64, role: Role) -> Result<String, TokenError> {
        self.generate_jwt(&Claims::new(user_id, role, self.ttl_secs))
    }

    pub fn generate_jwt(&self, claims: &Claims) -> Result<String, TokenError> {
        let encoding_key = EncodingKey::from_secret(self.secret()?.as_bytes());

        encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Validate signature and expiry, then the claim shape.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let decoding_key = DecodingKey::from_secret(self.secret()?.as_bytes());

        let token_data = decode::<Value>(token, &decoding_key, &self.validation).map_err(|e| {
            tracing::debug!("Token verification failed: {}", e);
            TokenError::InvalidOrExpired
        })?;

        Identity::from_payload(&token_data.claims)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("configured", &self.is_configured())
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}
