//! Lucid Integration Module
//!
//! Client for the Lucid REST API: OAuth2 authorization-code handshake, token
//! lifecycle and paginated resource access.
//!
//! # Features
//!
//! - Authorization URL for user and account clients
//! - Code exchange and token refresh (RFC 6749 Sections 4.1 and 6)
//! - Token introspection (RFC 7662)
//! - Automatic refresh of tokens about to expire
//! - Link-header pagination (RFC 8288), eager or page-at-a-time
//! - Scope checks before dispatch
//!
//! # Example
//!
//! ```rust,ignore
//! use integrations_lucid::{lucid_config, LucidClient, ScopeSet};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = lucid_config()
//!         .client_id("my-client-id")
//!         .client_secret("my-client-secret")
//!         .redirect_uri("http://localhost:8080/callback")
//!         .scopes(ScopeSet::user_defaults())
//!         .build()?;
//!
//!     let client = LucidClient::new(config)?;
//!     println!("Authorize at: {}", client.authorization_url());
//!
//!     // Code taken from the redirect.
//!     client.exchange_code("authorization-code").await?;
//!
//!     for document in client.documents().list(200).await? {
//!         println!("{} {:?}", document.document_id, document.title);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: configuration, token, scope and resource types
//! - `error`: error hierarchy and provider error mapping
//! - `core`: HTTP transport and URL encoding
//! - `token`: token store and client session
//! - `flows`: authorization-code flow
//! - `client`: request executor and the high-level client
//! - `pagination`: Link-header traversal
//! - `scope`: scope guard
//! - `services`: account, user and document accessors
//! - `builders`: fluent configuration builder

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod flows;
pub mod pagination;
pub mod scope;
pub mod services;
pub mod token;
pub mod types;

// Re-export main client
pub use client::{
    lucid_client, ApiRequest, ApiResponse, LucidClient, RequestExecutor, RequestOutcome,
};

// Re-export builders
pub use builders::{lucid_config, LucidConfigBuilder};

// Re-export errors
pub use error::{
    ConfigurationError, LucidError, LucidResult, NetworkError, OAuthError, OAuthErrorResponse,
};

// Re-export types
pub use types::{
    AccountInfo, ClientKind, Document, DocumentContent, DocumentOwner, DocumentSearchParameters,
    IntrospectionResult, LucidConfig, Scope, ScopeSet, TokenMaterial, TokenResponse,
};

// Re-export core components
pub use self::core::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
};

pub use flows::{AuthorizationFlow, LucidAuthorizationFlow};
pub use pagination::{PageStream, PaginationLinks, PaginationState, Paginator, MAX_PAGE_SIZE};
pub use scope::ScopeGuard;
pub use services::{
    save_json_to_file, AccountService, DocumentsService, UserAction, UserActionOutcome,
    UsersService,
};
pub use token::{ClientSession, TokenStore, REFRESH_BUFFER};
