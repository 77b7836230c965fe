mod common;

use std::sync::Arc;

use auth::JwtHandler;
use auth::KeyManager;
use auth_service::domain::identity::models::Identity;
use auth_service::domain::identity::models::Username;
use auth_service::domain::identity::ports::IdentityRepository;
use chrono::Duration;
use chrono::Utc;
use common::TestApp;
use common::DEFAULT_PASSWORD;
use common::DEFAULT_USERNAME;
use reqwest::StatusCode;
use serde_json::json;

fn admin() -> Username {
    Username::new(DEFAULT_USERNAME.to_string()).unwrap()
}

async fn token_for_admin(app: &TestApp) -> String {
    app.bootstrap().await;
    let response = app.login(DEFAULT_USERNAME, DEFAULT_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn validate(app: &TestApp, token: &str) -> reqwest::Response {
    app.post("/validate")
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn test_health_bootstraps_default_account() {
    let app = TestApp::spawn().await;

    let response = app.bootstrap().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "auth-service");
    assert_eq!(body["message"], "default account created");

    let identity = app
        .repository
        .find_by_username(&admin())
        .await
        .unwrap()
        .expect("default account should exist");
    assert!(identity.password_hash.starts_with("$2b$"));
    assert_ne!(identity.password_hash, DEFAULT_PASSWORD);
}

#[tokio::test]
async fn test_repeated_health_probes_do_not_rehash() {
    let app = TestApp::spawn().await;

    app.bootstrap().await;
    let first = app
        .repository
        .find_by_username(&admin())
        .await
        .unwrap()
        .unwrap();

    let response = app.bootstrap().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "default account present");

    let second = app
        .repository
        .find_by_username(&admin())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.password_hash, second.password_hash);
    assert_eq!(first.updated_at, second.updated_at);
    assert_eq!(app.repository.len().await, 1);
}

#[tokio::test]
async fn test_health_upgrades_staged_plaintext_password() {
    let app = TestApp::spawn().await;

    app.repository
        .save(Identity::new(admin(), DEFAULT_PASSWORD.to_string()))
        .await
        .unwrap();

    let response = app.bootstrap().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "default account password upgraded to hash");

    let response = app.login(DEFAULT_USERNAME, DEFAULT_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_and_validate_round_trip() {
    let app = TestApp::spawn().await;
    app.bootstrap().await;

    let response = app.login(DEFAULT_USERNAME, DEFAULT_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 200);
    assert_eq!(body["data"]["user"], "admin");
    assert!(body["data"]["expires_at"].is_string());
    let token = body["data"]["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);

    let response = validate(&app, token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"], json!({ "valid": true, "user": "admin" }));
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = TestApp::spawn().await;
    app.bootstrap().await;

    let wrong_password = app.login(DEFAULT_USERNAME, "wrong").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: serde_json::Value = wrong_password.json().await.unwrap();

    let unknown_user = app.login("ghost", "anything").await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: serde_json::Value = unknown_user.json().await.unwrap();

    assert_eq!(wrong_password["data"]["message"], "invalid credentials");
    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn test_login_before_bootstrap_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.login(DEFAULT_USERNAME, DEFAULT_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = TestApp::spawn().await;

    let response = app.login("", DEFAULT_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.login(DEFAULT_USERNAME, "").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post("/login")
        .json(&json!({ "username": DEFAULT_USERNAME }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["data"]["message"],
        "username and password are required"
    );
}

#[tokio::test]
async fn test_validate_rejects_badly_shaped_tokens() {
    let app = TestApp::spawn().await;

    for token in ["", "   ", "not-a-jwt", "a.b", "a..c", "a.b.c.d"] {
        let response = validate(&app, token).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "token {:?} should be refused",
            token
        );
    }
}

#[tokio::test]
async fn test_validate_reports_bad_signature() {
    let app = TestApp::spawn().await;
    let token = token_for_admin(&app).await;

    let (unsigned, signature) = token.rsplit_once('.').unwrap();
    let truncated = format!("{}.{}", unsigned, &signature[..signature.len() - 4]);

    let response = validate(&app, &truncated).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["data"],
        json!({ "valid": false, "error": "bad_signature" })
    );
}

#[tokio::test]
async fn test_validate_rejects_token_from_other_keypair() {
    let app = TestApp::spawn().await;

    let other_keys = Arc::new(KeyManager::generate().unwrap());
    let foreign = JwtHandler::new(other_keys).issue("id", "admin").unwrap();

    let response = validate(&app, &foreign.value).await;
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["valid"], false);
    assert_eq!(body["data"]["error"], "bad_signature");
}

#[tokio::test]
async fn test_validate_reports_expired_token() {
    let app = TestApp::spawn().await;

    let expired = JwtHandler::new(Arc::clone(&app.keys))
        .issue_at("id", "admin", Utc::now() - Duration::hours(25))
        .unwrap();

    let response = validate(&app, &expired.value).await;
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"], json!({ "valid": false, "error": "expired" }));
}

#[tokio::test]
async fn test_public_key_is_served_as_pem() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/public-key")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/x-pem-file"
    );

    let pem = response.text().await.unwrap();
    assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----"));
    assert_eq!(pem, app.keys.public_key_pem().unwrap());
}
