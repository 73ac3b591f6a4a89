//! Configuration Types
//!
//! Client configuration for the Lucid API.

use secrecy::SecretString;
use std::time::Duration;

use crate::error::{ConfigurationError, LucidError, LucidResult};
use crate::types::ScopeSet;

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.lucid.co";

/// Default token endpoint.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://api.lucid.co/oauth2/token";

/// User authorization endpoint.
pub const USER_AUTHORIZATION_ENDPOINT: &str = "https://lucid.app/oauth2/authorize";

/// Account authorization endpoint.
pub const ACCOUNT_AUTHORIZATION_ENDPOINT: &str = "https://lucid.app/oauth2/authorizeAccount";

/// Default value of the `Lucid-Api-Version` header.
pub const DEFAULT_API_VERSION: &str = "1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which authorization URL the client is registered against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClientKind {
    /// Acts on behalf of a single user.
    #[default]
    User,
    /// Acts on behalf of a whole account (admin consent).
    Account,
}

impl ClientKind {
    pub fn authorization_endpoint(&self) -> &'static str {
        match self {
            Self::User => USER_AUTHORIZATION_ENDPOINT,
            Self::Account => ACCOUNT_AUTHORIZATION_ENDPOINT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Account => "account",
        }
    }
}

impl std::str::FromStr for ClientKind {
    type Err = LucidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "account" => Ok(Self::Account),
            other => Err(LucidError::Configuration(ConfigurationError::InvalidConfig {
                message: format!("Unknown client kind: {}", other),
            })),
        }
    }
}

/// Lucid client configuration.
#[derive(Clone)]
pub struct LucidConfig {
    /// Client identifier.
    pub client_id: String,
    /// Client secret.
    pub client_secret: SecretString,
    /// Registered redirect URI.
    pub redirect_uri: String,
    /// Scopes requested and assumed granted.
    pub scopes: ScopeSet,
    /// Whether the app is published (unpublished apps only work for collaborators).
    pub published: bool,
    /// User or account client.
    pub kind: ClientKind,
    /// Authorization endpoint URL.
    pub authorization_endpoint: String,
    /// Token endpoint URL.
    pub token_endpoint: String,
    /// Introspection endpoint URL.
    pub introspection_endpoint: String,
    /// API base URL.
    pub api_base_url: String,
    /// Default `Lucid-Api-Version` header value.
    pub api_version: String,
    /// HTTP timeout.
    pub timeout: Duration,
}

impl LucidConfig {
    /// Load configuration from `LUCID_*` environment variables.
    pub fn from_env() -> LucidResult<Self> {
        let required = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    LucidError::Configuration(ConfigurationError::MissingRequired {
                        field: name.to_string(),
                    })
                })
        };

        let client_id = required("LUCID_CLIENT_ID")?;
        let client_secret = required("LUCID_CLIENT_SECRET")?;
        let redirect_uri = required("LUCID_REDIRECT_URI")?;

        let kind = match std::env::var("LUCID_CLIENT_KIND") {
            Ok(value) => value.parse()?,
            Err(_) => ClientKind::User,
        };

        let scopes = std::env::var("LUCID_SCOPES")
            .map(|s| ScopeSet::parse(&s))
            .unwrap_or_else(|_| match kind {
                ClientKind::User => ScopeSet::user_defaults(),
                ClientKind::Account => ScopeSet::account_defaults(),
            });

        let published = std::env::var("LUCID_PUBLISHED")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let mut builder = crate::builders::lucid_config()
            .client_id(client_id)
            .client_secret(client_secret)
            .redirect_uri(redirect_uri)
            .kind(kind)
            .scopes(scopes)
            .published(published);

        if let Ok(base) = std::env::var("LUCID_API_BASE_URL") {
            builder = builder.api_base_url(base);
        }
        if let Ok(token_url) = std::env::var("LUCID_TOKEN_URL") {
            builder = builder.token_endpoint(token_url);
        }
        if let Ok(version) = std::env::var("LUCID_API_VERSION") {
            builder = builder.api_version(version);
        }
        if let Some(secs) = std::env::var("LUCID_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Join a resource path onto the API base URL.
    pub fn resource_url(&self, path: &str) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}

impl std::fmt::Debug for LucidConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LucidConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("published", &self.published)
            .field("kind", &self.kind)
            .field("authorization_endpoint", &self.authorization_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .field("introspection_endpoint", &self.introspection_endpoint)
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}
