use std::net::SocketAddr;
use std::sync::Arc;

use api::app::build_router;
use api::config::AppConfig;
use api::services::FixedClock;
use api::AppState;
use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use infra::repos::GroundCatalog;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_SESSION_TOKEN: &str = "tok-123";

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Fixed "today" for every integration test: Saturday 2025-09-20.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 20).unwrap()
}

pub fn test_config(auth_base_url: Option<&str>, api_key: Option<&str>) -> AppConfig {
    let auth_base_url = auth_base_url.map(str::to_string);
    let api_key = api_key.map(str::to_string);
    AppConfig::from_lookup(move |key| match key {
        "AUTH_SERVICE_BASE_URL" => auth_base_url.clone(),
        "AUTH_SERVICE_API_KEY" => api_key.clone(),
        _ => None,
    })
    .expect("Failed to build test config")
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Test server failed");
    });

    format!("http://{}", addr)
}

pub async fn spawn_app_with(config: AppConfig) -> TestApp {
    let state = AppState::new(
        &config,
        GroundCatalog::builtin(),
        Arc::new(FixedClock(today())),
    );
    let app = build_router(state, &config).expect("Failed to build router");

    TestApp {
        base_url: serve(app).await,
        client: reqwest::Client::new(),
    }
}

/// App without an identity service configured.
#[allow(dead_code)]
pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config(None, None)).await
}

fn has_bearer(headers: &HeaderMap, token: &str) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", token))
        .unwrap_or(false)
}

/// Stand-in for the upstream identity service, mounted under `/api`. Returns its base URL.
#[allow(dead_code)]
pub async fn spawn_fake_identity_service() -> String {
    let routes = Router::new()
        .route(
            "/api/oauth/google/redirect_url",
            get(|headers: HeaderMap| async move {
                if !has_bearer(&headers, TEST_API_KEY) {
                    return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "redirectUrl": "https://accounts.google.com/o/oauth2/v2/auth?client_id=test"
                    })),
                )
            }),
        )
        .route(
            "/api/sessions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                if !has_bearer(&headers, TEST_API_KEY) {
                    return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
                }
                match body["code"].as_str() {
                    Some("good-code") => (
                        StatusCode::OK,
                        Json(json!({"session_token": TEST_SESSION_TOKEN})),
                    ),
                    _ => (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"error": "invalid code at https://internal.example/secret"})),
                    ),
                }
            }),
        )
        .route(
            "/api/users/me",
            get(|headers: HeaderMap| async move {
                if !has_bearer(&headers, TEST_SESSION_TOKEN) {
                    return (StatusCode::UNAUTHORIZED, Json(json!({"error": "no session"})));
                }
                (
                    StatusCode::OK,
                    Json(json!({"id": "user-1", "email": "captain@example.com"})),
                )
            }),
        );

    format!("{}/api", serve(routes).await)
}

/// Booking request body for ground 1.
#[allow(dead_code)]
pub fn booking_body(date: &str, start_time: u8, duration: u8) -> Value {
    json!({
        "ground_id": 1,
        "date": date,
        "start_time": start_time,
        "duration": duration,
        "team_name": "Chennai Chargers",
        "contact_number": "+91 99999 12345",
    })
}
