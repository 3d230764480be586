// API Middleware
//
// Inbound API-key authentication, layered onto a router only when a key is
// configured.

pub mod auth;

pub use auth::{auth_middleware, AuthState, API_KEY_HEADER};
