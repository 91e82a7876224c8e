// handlers/mod.rs - Handlers grouped by access tier
//
// Public (no auth) → Protected (bearer token) → Elevated (bearer token + ADMIN role)
//
// Each tier only declares handlers; the middleware stack that enforces the
// tier is attached in app.rs when the routers are assembled.
pub mod elevated;
pub mod protected;
pub mod public;
pub mod utils;
