//! Builders
//!
//! Fluent builders for Lucid configuration.

pub mod config;

pub use config::{lucid_config, LucidConfigBuilder};
