// HTTP API Error Types
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::{AuthError, TokenError};
use crate::middleware::GuardError;
use crate::store::models::ProductValidationError;
use crate::store::StoreError;

const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// HTTP API error; the one place domain errors become status codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError => INTERNAL_MESSAGE,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "message": self.message() })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Log the real cause, hand the client the generic message.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        tracing::error!("Internal error: {}", cause);
        ApiError::InternalServerError
    }
}

// Convert other error types to ApiError
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingSecret => {
                tracing::error!("JWT_SECRET is not set; rejecting authenticated request");
                ApiError::unauthorized(err.to_string())
            }
            TokenError::MissingToken | TokenError::InvalidOrExpired | TokenError::InvalidPayload => {
                ApiError::unauthorized(err.to_string())
            }
            TokenError::Generation(msg) => ApiError::internal(msg),
        }
    }
}

/// Login mapping. Routes that need a different status for a missing user
/// (e.g. `/auth/me`) match before converting.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UserNotFound => ApiError::not_found(err.to_string()),
            AuthError::InvalidCredentials | AuthError::Configuration => {
                ApiError::unauthorized(err.to_string())
            }
            AuthError::Password(e) => ApiError::internal(e),
            AuthError::Token(e) => e.into(),
        }
    }
}

impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::AuthenticationRequired => ApiError::unauthorized(err.to_string()),
            GuardError::InsufficientPermissions => ApiError::forbidden(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::not_found(err.to_string()),
            StoreError::Seed(e) => ApiError::internal(e),
            StoreError::DuplicateId(_) | StoreError::IdSpaceExhausted => ApiError::internal(err.to_string()),
        }
    }
}

impl From<ProductValidationError> for ApiError {
    fn from(err: ProductValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_map_to_401_messages() {
        let cases = [
            (TokenError::MissingToken, "No token provided"),
            (TokenError::InvalidOrExpired, "Invalid or expired token"),
            (TokenError::InvalidPayload, "Invalid token payload"),
            (TokenError::MissingSecret, "Authentication configuration error."),
        ];

        for (err, message) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(api.message(), message);
        }
    }

    #[test]
    fn guard_errors_split_401_and_403() {
        let denied: ApiError = GuardError::InsufficientPermissions.into();
        assert_eq!(denied, ApiError::forbidden("Insufficient permissions."));

        let anonymous: ApiError = GuardError::AuthenticationRequired.into();
        assert_eq!(anonymous, ApiError::unauthorized("Authentication required."));
    }

    #[test]
    fn login_errors_keep_enumeration_distinction() {
        assert_eq!(
            ApiError::from(AuthError::UserNotFound),
            ApiError::not_found("User not found")
        );
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::unauthorized("Invalid credentials")
        );
    }

    #[test]
    fn store_not_found_names_the_id() {
        let api: ApiError = StoreError::NotFound(99999).into();
        assert_eq!(api.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(api.to_json(), json!({ "message": "Product with ID 99999 not found" }));
    }

    #[test]
    fn exhausted_id_space_is_internal() {
        let api: ApiError = StoreError::IdSpaceExhausted.into();
        assert_eq!(api, ApiError::InternalServerError);
    }

    #[test]
    fn internal_errors_hide_details() {
        let api: ApiError = TokenError::Generation("key material exploded".to_string()).into();
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.to_json(), json!({ "message": "Internal Server Error" }));
    }
}
