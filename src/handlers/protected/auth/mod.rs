// handlers/protected/auth/mod.rs - Session endpoints for authenticated callers

pub mod me;
pub mod session;

pub use me::me_get;
pub use session::logout_post;
