pub mod auth;
pub mod rbac;

pub use auth::{extract_bearer_token, jwt_auth_middleware};
pub use rbac::{check_role, require_role, AllowedRoles, GuardError};
