//! Token Store
//!
//! Holds the current token material for one session.

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::error::{LucidError, LucidResult};
use crate::types::TokenMaterial;

/// Tokens expiring within this window are refreshed before use.
pub const REFRESH_BUFFER: Duration = Duration::from_secs(300);

/// Token store.
#[derive(Debug, Default)]
pub struct TokenStore {
    material: Option<TokenMaterial>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token material, or `invalid_grant` if no token has been issued yet.
    pub fn get(&self) -> LucidResult<&TokenMaterial> {
        self.material.as_ref().ok_or_else(|| {
            LucidError::oauth(
                "invalid_grant",
                "No token data available. Exchange an authorization code first.",
            )
        })
    }

    pub fn is_issued(&self) -> bool {
        self.material.is_some()
    }

    /// True if a token is held and expires within `buffer` of now.
    pub fn is_expiring_within(&self, buffer: Duration) -> bool {
        self.is_expiring_within_at(buffer, Utc::now())
    }

    pub fn is_expiring_within_at(&self, buffer: Duration, now: DateTime<Utc>) -> bool {
        self.material
            .as_ref()
            .map(|m| m.is_expiring_within_at(buffer, now))
            .unwrap_or(false)
    }

    /// Replace the held material wholesale.
    pub fn replace(&mut self, material: TokenMaterial) {
        self.material = Some(material);
    }

    /// Drop the held material.
    pub fn clear(&mut self) -> Option<TokenMaterial> {
        self.material.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenResponse;

    fn material(expires_in: u64, issued_at: DateTime<Utc>) -> TokenMaterial {
        let response: TokenResponse = serde_json::from_value(serde_json::json!({
            "access_token": "token",
            "expires_in": expires_in,
        }))
        .unwrap();
        TokenMaterial::from_response(response, issued_at).unwrap()
    }

    #[test]
    fn test_get_before_issue() {
        let store = TokenStore::new();
        let error = store.get().unwrap_err();
        assert_eq!(error.error_code(), "invalid_grant");
        assert!(!store.is_expiring_within(REFRESH_BUFFER));
    }

    #[test]
    fn test_expiry_uses_buffer() {
        let now = Utc::now();
        let mut store = TokenStore::new();

        store.replace(material(3600, now));
        assert!(!store.is_expiring_within_at(REFRESH_BUFFER, now));

        store.replace(material(120, now));
        assert!(store.is_expiring_within_at(REFRESH_BUFFER, now));
    }

    #[test]
    fn test_replace_and_clear() {
        let mut store = TokenStore::new();
        store.replace(material(60, Utc::now()));
        assert!(store.is_issued());
        assert!(store.clear().is_some());
        assert!(!store.is_issued());
    }
}
