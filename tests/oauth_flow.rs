//! Integration tests for the authorization-code flow against a mock provider.

mod common;

use common::*;
use integrations_lucid::{LucidClient, LucidError, OAuthError};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_exchange_code_success() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "account.info offline_access"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = assert_ok!(LucidClient::new(config_for(&server, "account.info")));
    let material = assert_ok!(client.exchange_code("the-code").await);

    assert_eq!(material.access_token(), "access-1");
    assert_eq!(material.refresh_token(), Some("refresh-1"));
    assert_eq!(assert_ok!(client.access_token().await), "access-1");
}

#[tokio::test]
async fn test_exchange_code_invalid_grant() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "bad code"
        })))
        .mount(&server)
        .await;

    let client = assert_ok!(LucidClient::new(config_for(&server, "account.info")));
    let error = assert_err!(client.exchange_code("bad").await);

    match error {
        LucidError::OAuth(e) => assert_eq!(e, OAuthError::new("invalid_grant", "bad code")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_expiring_token_is_refreshed_before_call() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/accounts/me"))
        .and(header("authorization", "Bearer fresh"))
        .and(header("lucid-api-version", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9, "name": "Acme"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = std::sync::Arc::new(integrations_lucid::ClientSession::with_tokens(
        config_for(&server, "account.info"),
        token("stale", 60),
    ));
    let transport =
        std::sync::Arc::new(assert_ok!(integrations_lucid::ReqwestHttpTransport::new()));
    let client = LucidClient::with_session(session, transport);

    let info = assert_ok!(client.account().info().await);
    assert_eq!(info.name, "Acme");

    let refreshed = client.session().token_snapshot().await.expect("token held");
    assert_eq!(refreshed.refresh_token(), Some("refresh-1"));
}

#[tokio::test]
async fn test_introspection_validity() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token/introspect"))
        .and(body_json(json!({
            "token": "access-1",
            "client_id": "test-client",
            "client_secret": "test-secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = authorized_client(&server, "account.info");
    assert!(client.is_token_valid().await);
}

#[tokio::test]
async fn test_introspection_forbidden() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token/introspect"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = authorized_client(&server, "account.info");
    let error = assert_err!(client.introspect("access-1").await);
    assert_eq!(error.error_code(), "invalid_client");
    assert!(!client.is_token_valid().await);
}

#[tokio::test]
async fn test_resource_401_is_auth_failure() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/accounts/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "anything at all"})),
        )
        .mount(&server)
        .await;

    let client = authorized_client(&server, "account.info");
    let error = assert_err!(client.account().info().await);

    match error {
        LucidError::Unauthorized { reason } => {
            assert_eq!(reason, integrations_lucid::client::AUTH_FAILURE_REASON)
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_authorization_url_for_unpublished_app() {
    let server = setup_mock_server().await;
    let client = assert_ok!(LucidClient::new(config_for(
        &server,
        "lucidchart.document.content offline_access"
    )));

    assert_eq!(
        client.authorization_url(),
        "https://lucid.app/oauth2/authorize?client_id=test-client\
         &redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcallback\
         &scope=lucidchart.document.content%20offline_access&response_type=code"
    );
}
