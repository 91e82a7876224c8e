// handlers/elevated/mod.rs - ADMIN-only handlers
//
// Mounted behind the token verifier and the role guard, in that order.

pub mod products;
