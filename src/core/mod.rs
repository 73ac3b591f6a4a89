//! Core infrastructure: HTTP transport and URL encoding.

pub mod encoding;
pub mod transport;

pub use encoding::encode_component;
pub use transport::*;
