// handlers/protected/mod.rs - Handlers behind the bearer token verifier
//
// Every handler here can rely on an `Identity` in the request extensions.

pub mod auth;
