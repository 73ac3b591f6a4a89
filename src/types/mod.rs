//! Lucid Types
//!
//! Core type definitions for configuration, tokens, scopes and resources.

pub mod config;
pub mod introspection;
pub mod models;
pub mod scope;
pub mod token;

pub use config::*;
pub use introspection::IntrospectionResult;
pub(crate) use introspection::IntrospectionRequest;
pub use models::*;
pub use scope::*;
pub use token::*;
