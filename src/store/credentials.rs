use crate::auth::password::{hash_password, PasswordError};
use crate::store::models::User;
use crate::types::Role;

/// Accounts created at process start. Passwords are hashed on load.
const SEED_USERS: &[(u64, &str, &str, Role)] = &[
    (1, "admin", "password123", Role::Admin),
    (2, "user", "password456", Role::User),
];

/// Read-only user table. There is no update or delete path once seeded.
#[derive(Debug, Default)]
pub struct CredentialStore {
    users: Vec<User>,
}

impl CredentialStore {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Build the store from the fixed seed list.
    pub fn seeded() -> Result<Self, PasswordError> {
        Self::from_plaintext(SEED_USERS)
    }

    /// Hash each `(id, username, password, role)` entry into a user record.
    pub fn from_plaintext(entries: &[(u64, &str, &str, Role)]) -> Result<Self, PasswordError> {
        let users = entries
            .iter()
            .map(|&(id, username, password, role)| {
                Ok(User {
                    id,
                    username: username.to_string(),
                    password_hash: hash_password(password)?,
                    role,
                })
            })
            .collect::<Result<Vec<_>, PasswordError>>()?;

        tracing::info!("Credential store initialized with {} users", users.len());
        Ok(Self::new(users))
    }

    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    pub fn find_by_id(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
