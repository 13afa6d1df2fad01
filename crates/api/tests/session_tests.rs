mod common;

use common::*;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn spawn_with_identity_service() -> TestApp {
    let upstream = spawn_fake_identity_service().await;
    spawn_app_with(test_config(Some(&upstream), Some(TEST_API_KEY))).await
}

#[tokio::test]
async fn test_google_redirect_url_is_proxied() {
    let app = spawn_with_identity_service().await;

    let response = app
        .client
        .get(app.url("/oauth/google/redirect_url"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["redirect_url"],
        "https://accounts.google.com/o/oauth2/v2/auth?client_id=test"
    );
}

#[tokio::test]
async fn test_create_session_sets_cross_site_cookie() {
    let app = spawn_with_identity_service().await;

    let response = app
        .client
        .post(app.url("/sessions"))
        .json(&json!({"code": "good-code"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with(&format!("session_token={}", TEST_SESSION_TOKEN)));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=None"));
    assert!(cookie.contains("Secure"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true}));
}

#[tokio::test]
async fn test_current_user_uses_session_cookie() {
    let app = spawn_with_identity_service().await;

    let response = app
        .client
        .get(app.url("/users/me"))
        .header("Cookie", format!("session_token={}", TEST_SESSION_TOKEN))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["email"], "captain@example.com");

    let response = app.client.get(app.url("/users/me")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .client
        .get(app.url("/users/me"))
        .header("Cookie", "session_token=stale")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upstream_failure_is_generic() {
    let app = spawn_with_identity_service().await;

    let response = app
        .client
        .post(app.url("/sessions"))
        .json(&json!({"code": "bad-code"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response.text().await.unwrap();
    assert!(!body.contains("internal.example"));
    assert!(body.contains("authentication service unavailable"));
}

#[tokio::test]
async fn test_wrong_api_key_is_upstream_error() {
    let upstream = spawn_fake_identity_service().await;
    let app = spawn_app_with(test_config(Some(&upstream), Some("wrong-key"))).await;

    let response = app
        .client
        .get(app.url("/oauth/google/redirect_url"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response.text().await.unwrap();
    assert!(!body.contains("wrong-key"));
}

#[tokio::test]
async fn test_empty_code_is_bad_request() {
    let app = spawn_with_identity_service().await;

    let response = app
        .client
        .post(app.url("/sessions"))
        .json(&json!({"code": "  "}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unconfigured_identity_service() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/oauth/google/redirect_url"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app
        .client
        .post(app.url("/sessions"))
        .json(&json!({"code": "good-code"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = spawn_app().await;

    let response = app.client.post(app.url("/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session_token=;"));
    assert!(cookie.contains("Max-Age=0"));
}
