//! Token Management
//!
//! Token material held by a client session.
//!
//! - **Token Store**: current token material and its expiry
//! - **Client Session**: credentials, granted scopes and the serialized token store

pub mod session;
pub mod store;

pub use session::ClientSession;
pub use store::{TokenStore, REFRESH_BUFFER};
