// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, read-only product browsing and service metadata.

pub mod auth;
pub mod health;
pub mod products;
