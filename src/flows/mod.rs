//! Lucid Flows
//!
//! Client side of the OAuth2 authorization-code handshake:
//! authorization URL, code exchange, refresh and introspection.

pub mod authorization_code;

pub use authorization_code::{AuthorizationFlow, LucidAuthorizationFlow};
