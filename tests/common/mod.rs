//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use integrations_lucid::{
    lucid_config, ClientSession, LucidClient, LucidConfig, ReqwestHttpTransport, ScopeSet,
    TokenMaterial, TokenResponse,
};
use serde_json::json;
use wiremock::MockServer;

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn config_for(server: &MockServer, scopes: &str) -> LucidConfig {
    lucid_config()
        .client_id("test-client")
        .client_secret("test-secret")
        .redirect_uri("http://localhost:8080/callback")
        .scopes(ScopeSet::parse(scopes))
        .api_base_url(server.uri())
        .token_endpoint(format!("{}/oauth2/token", server.uri()))
        .build()
        .expect("valid config")
}

pub fn token(access: &str, expires_in: u64) -> TokenMaterial {
    let response: TokenResponse = serde_json::from_value(json!({
        "access_token": access,
        "refresh_token": "refresh-1",
        "expires_in": expires_in,
    }))
    .expect("token response");
    TokenMaterial::from_response(response, Utc::now()).expect("token material")
}

/// Client whose session already holds a long-lived token.
pub fn authorized_client(server: &MockServer, scopes: &str) -> LucidClient {
    let session = Arc::new(ClientSession::with_tokens(
        config_for(server, scopes),
        token("access-1", 3600),
    ));
    let transport = Arc::new(ReqwestHttpTransport::new().expect("transport"));
    LucidClient::with_session(session, transport)
}
