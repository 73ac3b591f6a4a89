//! Authorization Code Flow
//!
//! Authorization URL construction, code exchange, token refresh and introspection.

use async_trait::async_trait;
use chrono::Utc;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::{encode_component, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::{
    oauth_error_from_body, oauth_error_from_transport, LucidError, LucidResult,
};
use crate::token::{ClientSession, TokenStore, REFRESH_BUFFER};
use crate::types::{IntrospectionRequest, IntrospectionResult, TokenMaterial, TokenResponse};

/// Authorization flow interface.
#[async_trait]
pub trait AuthorizationFlow: Send + Sync {
    /// Build the URL the user is sent to for consent.
    fn build_authorization_url(&self, session: &ClientSession) -> String;

    /// Exchange an authorization code for token material and store it in the session.
    async fn exchange_code(&self, session: &ClientSession, code: &str)
        -> LucidResult<TokenMaterial>;

    /// Refresh the session's token material.
    async fn refresh(&self, session: &ClientSession) -> LucidResult<TokenMaterial>;

    /// Introspect a token.
    async fn introspect(
        &self,
        session: &ClientSession,
        token: &str,
    ) -> LucidResult<IntrospectionResult>;

    /// True only if introspection reports the session's access token as active.
    async fn is_valid(&self, session: &ClientSession) -> bool;

    /// Access token usable for the next request, refreshed first if it is about to expire.
    async fn access_token(&self, session: &ClientSession) -> LucidResult<String>;
}

/// Authorization flow against the Lucid OAuth2 endpoints.
pub struct LucidAuthorizationFlow<T: HttpTransport> {
    transport: Arc<T>,
}

impl<T: HttpTransport> LucidAuthorizationFlow<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    fn form_headers() -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        headers.insert("accept".to_string(), "application/json".to_string());
        headers
    }

    /// POST a grant to the token endpoint and turn the reply into token material.
    async fn request_token(
        &self,
        session: &ClientSession,
        params: &[(&str, &str)],
    ) -> LucidResult<TokenMaterial> {
        let config = session.config();
        let body = serde_urlencoded::to_string(params)
            .map_err(|e| LucidError::oauth("parsing_error", e.to_string()))?;

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: config.token_endpoint.clone(),
            headers: Self::form_headers(),
            body: Some(body),
            timeout: Some(config.timeout),
        };

        let response = self
            .transport
            .send(request)
            .await
            .map_err(oauth_error_from_transport)?;

        if !response.is_success() {
            let error = oauth_error_from_body(&response.body);
            warn!(
                status = response.status,
                code = %error.code,
                "Token endpoint rejected the grant"
            );
            return Err(error.into());
        }

        let token: TokenResponse = serde_json::from_str(&response.body).map_err(|e| {
            LucidError::oauth(
                "parsing_error",
                format!("Error occurred while parsing the response: {}", e),
            )
        })?;

        TokenMaterial::from_response(token, Utc::now())
    }

    /// Refresh while the caller already holds the token store lock.
    async fn refresh_locked(
        &self,
        session: &ClientSession,
        store: &mut TokenStore,
    ) -> LucidResult<TokenMaterial> {
        let current = store
            .get()
            .ok()
            .filter(|m| m.has_refresh_token())
            .cloned()
            .ok_or_else(|| LucidError::oauth("invalid_grant", "No refresh token available"))?;

        let config = session.config();
        let refresh_token = current.refresh_token().unwrap_or_default();
        let params = [
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.expose_secret().as_str()),
            ("grant_type", "refresh_token"),
        ];

        let mut material = self.request_token(session, &params).await?;
        material.inherit_refresh_token(&current);
        store.replace(material.clone());

        info!(
            client_id = %config.client_id,
            expires_at = %material.expires_at,
            "Refreshed access token"
        );
        Ok(material)
    }

    fn classify_introspection(response: HttpResponse) -> LucidResult<IntrospectionResult> {
        if response.status == 403 {
            return Err(LucidError::oauth(
                "invalid_client",
                "Invalid client credentials",
            ));
        }
        if !response.is_success() {
            return Err(LucidError::Api {
                status: response.status,
                body: response.body,
            });
        }
        serde_json::from_str(&response.body).map_err(|e| {
            LucidError::parse(format!("Failed to parse introspection response: {}", e))
        })
    }
}

#[async_trait]
impl<T: HttpTransport> AuthorizationFlow for LucidAuthorizationFlow<T> {
    fn build_authorization_url(&self, session: &ClientSession) -> String {
        let config = session.config();

        if !session.is_published() {
            warn!(
                client_id = %config.client_id,
                "This app is not published. Only specified app collaborators can use it."
            );
        }

        let scope = config.scopes.to_space_separated();
        let query = [
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", scope.as_str()),
            ("response_type", "code"),
        ]
        .iter()
        .map(|(k, v)| format!("{}={}", k, encode_component(v)))
        .collect::<Vec<_>>()
        .join("&");

        format!("{}?{}", config.authorization_endpoint, query)
    }

    async fn exchange_code(
        &self,
        session: &ClientSession,
        code: &str,
    ) -> LucidResult<TokenMaterial> {
        let config = session.config();
        let params = [
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.expose_secret().as_str()),
            ("grant_type", "authorization_code"),
            ("redirect_uri", config.redirect_uri.as_str()),
        ];

        let mut store = session.tokens().await;
        let material = self.request_token(session, &params).await?;
        store.replace(material.clone());

        info!(
            client_id = %config.client_id,
            expires_at = %material.expires_at,
            has_refresh_token = material.has_refresh_token(),
            "Exchanged authorization code for access token"
        );
        Ok(material)
    }

    async fn refresh(&self, session: &ClientSession) -> LucidResult<TokenMaterial> {
        let mut store = session.tokens().await;
        self.refresh_locked(session, &mut store).await
    }

    async fn introspect(
        &self,
        session: &ClientSession,
        token: &str,
    ) -> LucidResult<IntrospectionResult> {
        let config = session.config();
        let body = serde_json::to_string(&IntrospectionRequest {
            token,
            client_id: &config.client_id,
            client_secret: config.client_secret.expose_secret(),
        })
        .map_err(|e| LucidError::parse(e.to_string()))?;

        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("accept".to_string(), "application/json".to_string());

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: config.introspection_endpoint.clone(),
            headers,
            body: Some(body),
            timeout: Some(config.timeout),
        };

        let response = self.transport.send(request).await?;
        Self::classify_introspection(response)
    }

    async fn is_valid(&self, session: &ClientSession) -> bool {
        let token = match session.token_snapshot().await {
            Some(material) if !material.access_token().is_empty() => {
                material.access_token().to_string()
            }
            _ => return false,
        };

        match self.introspect(session, &token).await {
            Ok(result) => result.is_active(),
            Err(e) => {
                debug!(error = %e, "Introspection failed; treating token as invalid");
                false
            }
        }
    }

    async fn access_token(&self, session: &ClientSession) -> LucidResult<String> {
        let mut store = session.tokens().await;

        if !store.is_issued() {
            return Err(LucidError::oauth(
                "invalid_token",
                "No access token available. Exchange an authorization code first.",
            ));
        }

        if store.is_expiring_within(REFRESH_BUFFER) {
            debug!("Access token expires within the refresh buffer; refreshing");
            self.refresh_locked(session, &mut store).await?;
        }

        let material = store.get()?;
        if material.access_token().is_empty() {
            return Err(LucidError::oauth(
                "invalid_token",
                "Access token is missing or empty.",
            ));
        }

        Ok(material.access_token().to_string())
    }
}
