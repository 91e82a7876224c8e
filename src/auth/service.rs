use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use super::password::{verify_password, PasswordError};
use super::{TokenError, TokenSigner};
use crate::store::models::UserProfile;
use crate::store::CredentialStore;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication configuration error.")]
    Configuration,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(TokenError),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingSecret => AuthError::Configuration,
            other => AuthError::Token(other),
        }
    }
}

/// Verifies credentials against the credential store and issues access tokens.
/// Stateless: nothing is recorded per login.
#[derive(Clone, Debug)]
pub struct AuthService {
    users: Arc<CredentialStore>,
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(users: Arc<CredentialStore>, signer: TokenSigner) -> Self {
        Self { users, signer }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Exchange a username/password pair for a signed access token.
    ///
    /// Unknown usernames and wrong passwords are reported separately.
    pub fn authenticate(&self, username: &str, password_attempt: &str) -> Result<String, AuthError> {
        let user = self.users.find_by_username(username).ok_or_else(|| {
            warn!("Login failed: user '{}' not found", username);
            AuthError::UserNotFound
        })?;

        if !verify_password(password_attempt, &user.password_hash)? {
            warn!("Login failed: invalid credentials for user '{}'", username);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.signer.issue(user.id, user.role).map_err(|e| {
            if e == TokenError::MissingSecret {
                tracing::error!("JWT_SECRET is not set; refusing to issue tokens");
            }
            AuthError::from(e)
        })?;

        info!("User '{}' (ID: {}) logged in as {}", user.username, user.id, user.role);
        Ok(token)
    }

    pub fn get_profile(&self, user_id: u64) -> Result<UserProfile, AuthError> {
        self.users
            .find_by_id(user_id)
            .map(|user| user.profile())
            .ok_or(AuthError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Identity;
    use crate::types::Role;

    fn service_with_secret(secret: Option<&str>) -> AuthService {
        let users = CredentialStore::seeded().unwrap();
        AuthService::new(
            Arc::new(users),
            TokenSigner::new(secret.map(str::to_string), 3600),
        )
    }

    #[test]
    fn seeded_users_get_tokens_carrying_their_claims() {
        let service = service_with_secret(Some("unit-secret"));

        let token = service.authenticate("admin", "password123").unwrap();
        assert_eq!(
            service.signer().verify(&token).unwrap(),
            Identity { user_id: 1, role: Role::Admin }
        );

        let token = service.authenticate("user", "password456").unwrap();
        assert_eq!(
            service.signer().verify(&token).unwrap(),
            Identity { user_id: 2, role: Role::User }
        );
    }

    #[test]
    fn unknown_user_and_bad_password_are_distinct() {
        let service = service_with_secret(Some("unit-secret"));

        assert!(matches!(
            service.authenticate("nonexistent", "password123"),
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            service.authenticate("admin", "wrongpassword"),
            Err(AuthError::InvalidCredentials)
        ));
        // Another user's password is still just a wrong password
        assert!(matches!(
            service.authenticate("admin", "password456"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn missing_secret_refuses_to_issue() {
        let service = service_with_secret(None);

        assert!(matches!(
            service.authenticate("admin", "password123"),
            Err(AuthError::Configuration)
        ));
    }

    #[test]
    fn credentials_are_checked_before_the_secret() {
        let service = service_with_secret(None);

        assert!(matches!(
            service.authenticate("ghost", "x"),
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            service.authenticate("admin", "x"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn profile_strips_hash() {
        let service = service_with_secret(Some("unit-secret"));

        let profile = service.get_profile(1).unwrap();
        assert_eq!(profile.username, "admin");
        assert_eq!(profile.role, Role::Admin);

        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("password_hash").is_none());
        assert!(value.get("passwordHash").is_none());

        assert!(matches!(service.get_profile(42), Err(AuthError::UserNotFound)));
    }
}
