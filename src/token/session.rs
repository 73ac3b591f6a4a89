//! Client Session
//!
//! Credentials, granted scopes and exclusively-owned token material.

use tokio::sync::{Mutex, MutexGuard};

use crate::types::{LucidConfig, ScopeSet, TokenMaterial};
use crate::token::TokenStore;

/// One authorized client session.
///
/// The token store sits behind an async mutex so that the
/// check-expiry/refresh/read sequence runs as one critical section.
#[derive(Debug)]
pub struct ClientSession {
    config: LucidConfig,
    tokens: Mutex<TokenStore>,
}

impl ClientSession {
    pub fn new(config: LucidConfig) -> Self {
        Self {
            config,
            tokens: Mutex::new(TokenStore::new()),
        }
    }

    /// Start a session from previously issued token material.
    pub fn with_tokens(config: LucidConfig, material: TokenMaterial) -> Self {
        let mut store = TokenStore::new();
        store.replace(material);
        Self {
            config,
            tokens: Mutex::new(store),
        }
    }

    pub fn config(&self) -> &LucidConfig {
        &self.config
    }

    pub fn client_id(&self) -> &str {
        &self.config.client_id
    }

    pub fn granted_scopes(&self) -> &ScopeSet {
        &self.config.scopes
    }

    pub fn is_published(&self) -> bool {
        self.config.published
    }

    /// Lock the token store.
    pub async fn tokens(&self) -> MutexGuard<'_, TokenStore> {
        self.tokens.lock().await
    }

    /// Copy of the current token material, if issued.
    pub async fn token_snapshot(&self) -> Option<TokenMaterial> {
        self.tokens.lock().await.get().ok().cloned()
    }
}
