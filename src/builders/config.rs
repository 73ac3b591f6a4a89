//! Configuration Builder
//!
//! Fluent builder for Lucid client configuration.

use secrecy::SecretString;
use std::time::Duration;

use crate::error::{ConfigurationError, LucidError, LucidResult};
use crate::types::{
    ClientKind, LucidConfig, Scope, ScopeSet, DEFAULT_API_BASE_URL, DEFAULT_API_VERSION,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_ENDPOINT,
};

/// Lucid configuration builder.
#[derive(Default)]
pub struct LucidConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    redirect_uri: Option<String>,
    scopes: ScopeSet,
    published: bool,
    kind: ClientKind,
    authorization_endpoint: Option<String>,
    token_endpoint: Option<String>,
    introspection_endpoint: Option<String>,
    api_base_url: Option<String>,
    api_version: Option<String>,
    timeout: Option<Duration>,
}

impl LucidConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    /// Set redirect URI.
    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Replace the scope set.
    pub fn scopes(mut self, scopes: ScopeSet) -> Self {
        self.scopes = scopes;
        self
    }

    /// Add a scope.
    pub fn add_scope(mut self, scope: impl Into<Scope>) -> Self {
        self.scopes.insert(scope.into());
        self
    }

    /// Mark the app as published.
    pub fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Set the client kind (selects the default authorization endpoint).
    pub fn kind(mut self, kind: ClientKind) -> Self {
        self.kind = kind;
        self
    }

    /// Override the authorization endpoint.
    pub fn authorization_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.authorization_endpoint = Some(endpoint.into());
        self
    }

    /// Override the token endpoint.
    pub fn token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = Some(endpoint.into());
        self
    }

    /// Override the introspection endpoint.
    pub fn introspection_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.introspection_endpoint = Some(endpoint.into());
        self
    }

    /// Set API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set default API version header value.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> LucidResult<LucidConfig> {
        let client_id = required(self.client_id, "client_id")?;
        let client_secret = self.client_secret.ok_or_else(|| missing("client_secret"))?;
        let redirect_uri = required(self.redirect_uri, "redirect_uri")?;

        let api_base_url = self
            .api_base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = api_base_url.trim_end_matches('/').to_string();
        validate_endpoint(&api_base_url)?;

        let authorization_endpoint = self
            .authorization_endpoint
            .unwrap_or_else(|| self.kind.authorization_endpoint().to_string());
        let token_endpoint = self
            .token_endpoint
            .unwrap_or_else(|| DEFAULT_TOKEN_ENDPOINT.to_string());
        let introspection_endpoint = self
            .introspection_endpoint
            .unwrap_or_else(|| format!("{}/oauth2/token/introspect", api_base_url));

        for endpoint in [&authorization_endpoint, &token_endpoint, &introspection_endpoint] {
            validate_endpoint(endpoint)?;
        }

        Ok(LucidConfig {
            client_id,
            client_secret,
            redirect_uri,
            scopes: self.scopes,
            published: self.published,
            kind: self.kind,
            authorization_endpoint,
            token_endpoint,
            introspection_endpoint,
            api_base_url,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

fn missing(field: &str) -> LucidError {
    LucidError::Configuration(ConfigurationError::MissingRequired {
        field: field.to_string(),
    })
}

fn required(value: Option<String>, field: &str) -> LucidResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| missing(field))
}

fn validate_endpoint(endpoint: &str) -> LucidResult<()> {
    url::Url::parse(endpoint).map(|_| ()).map_err(|_| {
        LucidError::Configuration(ConfigurationError::InvalidEndpoint {
            url: endpoint.to_string(),
        })
    })
}

/// Create a new Lucid configuration builder.
pub fn lucid_config() -> LucidConfigBuilder {
    LucidConfigBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> LucidConfigBuilder {
        lucid_config()
            .client_id("test-client")
            .client_secret("test-secret")
            .redirect_uri("http://localhost:8080/callback")
    }

    #[test]
    fn test_builder_defaults() {
        let config = base().build().unwrap();

        assert_eq!(config.client_id, "test-client");
        assert_eq!(config.kind, ClientKind::User);
        assert_eq!(config.authorization_endpoint, "https://lucid.app/oauth2/authorize");
        assert_eq!(config.token_endpoint, "https://api.lucid.co/oauth2/token");
        assert_eq!(
            config.introspection_endpoint,
            "https://api.lucid.co/oauth2/token/introspect"
        );
        assert_eq!(config.api_version, "1");
        assert!(!config.published);
    }

    #[test]
    fn test_builder_account_kind_and_scopes() {
        let config = base()
            .kind(ClientKind::Account)
            .add_scope("account.user")
            .add_scope(Scope::OfflineAccess)
            .build()
            .unwrap();

        assert_eq!(
            config.authorization_endpoint,
            "https://lucid.app/oauth2/authorizeAccount"
        );
        assert!(config.scopes.contains(&Scope::AccountUser));
        assert_eq!(config.scopes.len(), 2);
    }

    #[test]
    fn test_introspection_follows_base_url() {
        let config = base().api_base_url("http://127.0.0.1:9000/").build().unwrap();
        assert_eq!(
            config.introspection_endpoint,
            "http://127.0.0.1:9000/oauth2/token/introspect"
        );
    }

    #[test]
    fn test_builder_missing_client_id() {
        let result = lucid_config()
            .client_secret("test-secret")
            .redirect_uri("http://localhost/cb")
            .build();

        assert!(matches!(
            result,
            Err(LucidError::Configuration(ConfigurationError::MissingRequired { ref field }))
                if field == "client_id"
        ));
    }

    #[test]
    fn test_builder_missing_secret() {
        let result = lucid_config()
            .client_id("id")
            .redirect_uri("http://localhost/cb")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_invalid_endpoint() {
        let result = base().token_endpoint("not a url").build();
        assert!(matches!(
            result,
            Err(LucidError::Configuration(ConfigurationError::InvalidEndpoint { .. }))
        ));
    }
}
