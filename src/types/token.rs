//! Token Types
//!
//! Token endpoint response and the typed token material held by a session.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{LucidError, LucidResult};
use crate::types::ScopeSet;

/// Token response from the token endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Token type (usually "Bearer").
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds, relative to issuance.
    pub expires_in: u64,
    /// Refresh token (present when `offline_access` was granted).
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Granted scopes, space separated.
    #[serde(default)]
    pub scope: Option<String>,
    /// Additional provider fields.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Token material owned by a single client session.
///
/// `expires_at` is always derived from `expires_in` at issuance time.
#[derive(Clone)]
pub struct TokenMaterial {
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    /// Token type.
    pub token_type: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Scopes reported by the provider, if any.
    pub scopes: ScopeSet,
}

impl TokenMaterial {
    /// Build from a token response issued at `issued_at`.
    ///
    /// An `expires_in` that cannot be represented as an absolute time is a `parsing_error`.
    pub fn from_response(response: TokenResponse, issued_at: DateTime<Utc>) -> LucidResult<Self> {
        let expires_at = i64::try_from(response.expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| {
                LucidError::oauth(
                    "parsing_error",
                    format!("expires_in out of range: {}", response.expires_in),
                )
            })?;

        Ok(Self {
            access_token: SecretString::new(response.access_token),
            refresh_token: response.refresh_token.map(SecretString::new),
            token_type: response.token_type,
            expires_at,
            scopes: response
                .scope
                .as_deref()
                .map(ScopeSet::parse)
                .unwrap_or_default(),
        })
    }

    /// Access token value (for the Authorization header).
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(|t| t.expose_secret().as_str())
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Carry a refresh token over from previous material when the provider omitted one.
    pub(crate) fn inherit_refresh_token(&mut self, previous: &TokenMaterial) {
        if self.refresh_token.is_none() {
            self.refresh_token = previous.refresh_token.clone();
        }
    }

    /// True if the token expires at or before `now + buffer`.
    pub fn is_expiring_within_at(&self, buffer: std::time::Duration, now: DateTime<Utc>) -> bool {
        match Duration::from_std(buffer)
            .ok()
            .and_then(|b| now.checked_add_signed(b))
        {
            Some(limit) => self.expires_at <= limit,
            None => true,
        }
    }

    /// Format as Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }
}

impl std::fmt::Debug for TokenMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenMaterial")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(expires_in: u64) -> TokenResponse {
        serde_json::from_value(serde_json::json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "expires_in": expires_in,
            "scope": "offline_access account.info",
        }))
        .unwrap()
    }

    #[test]
    fn test_token_response_parsing() {
        let parsed = response(3600);
        assert_eq!(parsed.access_token, "access-1");
        assert_eq!(parsed.token_type, "Bearer");
        assert_eq!(parsed.expires_in, 3600);
    }

    #[test]
    fn test_token_response_requires_expires_in() {
        let result: Result<TokenResponse, _> =
            serde_json::from_str(r#"{"access_token":"a"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_expiry_is_derived_from_issuance_time() {
        let issued_at = Utc::now();
        let material = TokenMaterial::from_response(response(3600), issued_at).unwrap();
        assert_eq!(material.expires_at, issued_at + Duration::seconds(3600));

        let reissued = TokenMaterial::from_response(response(3600), issued_at).unwrap();
        assert_eq!(reissued.expires_at, material.expires_at);
    }

    #[test]
    fn test_out_of_range_lifetime_is_parsing_error() {
        let issued_at = Utc::now();
        for expires_in in [10_000_000_000_000, u64::MAX] {
            let error = TokenMaterial::from_response(response(expires_in), issued_at).unwrap_err();
            assert_eq!(error.error_code(), "parsing_error");
        }
    }

    #[test]
    fn test_expiring_within_buffer() {
        let now = Utc::now();
        let material = TokenMaterial::from_response(response(240), now).unwrap();
        let five_minutes = std::time::Duration::from_secs(300);

        assert!(material.is_expiring_within_at(five_minutes, now));
        assert!(!material.is_expiring_within_at(std::time::Duration::from_secs(60), now));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let material = TokenMaterial::from_response(response(60), Utc::now()).unwrap();
        let debug = format!("{:?}", material);
        assert!(!debug.contains("access-1"));
        assert!(!debug.contains("refresh-1"));
        assert_eq!(material.authorization_header(), "Bearer access-1");
    }
}
